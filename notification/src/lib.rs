use aws_sdk_sns::Client as SnsClient;
use chrono::Utc;
use common::config::Settings;
use tracing::{debug, warn};

/// Publishes run outcome notifications to an SNS topic.
///
/// Publishing is best-effort: outside AWS, or without a configured topic,
/// every publish is a no-op, and delivery errors are logged as warnings and
/// never propagated.
pub struct Notifier {
    client: SnsClient,
    topic_arn: String,
    environment_name: String,
}

impl Notifier {
    pub async fn new(settings: &Settings) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: SnsClient::new(&config),
            topic_arn: settings.aws_sns_topic_arn.clone(),
            environment_name: settings.environment_name.clone(),
        }
    }

    pub async fn publish_success(&self, details: &str) {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S%.6f");
        let mut body = format!("Process succeeded at {timestamp} UTC.\r\n");
        if !details.is_empty() {
            body += &format!("Details:\r\n{details}\r\n");
        }
        self.publish(&self.subject_line("SUCCESS"), &body).await;
    }

    pub async fn publish_failure(&self, details: &str) {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S%.6f");
        let mut body = format!("Process failed at {timestamp} UTC.\r\n");
        if !details.is_empty() {
            body += &format!("Details:\r\n{details}\r\n");
        }
        self.publish(&self.subject_line("FAILED"), &body).await;
    }

    fn subject_line(&self, status: &str) -> String {
        format!("{} {status}", title_case(&self.environment_name))
    }

    async fn publish(&self, subject: &str, body: &str) {
        if !common::env::is_running_in_aws() || self.topic_arn.is_empty() {
            return;
        }

        debug!("Sending SNS notification...");
        let result = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(subject)
            .message(body)
            .send()
            .await;
        match result {
            Ok(_) => debug!("SNS notification sent."),
            Err(e) => warn!(error = %e, "Error sending notification"),
        }
    }
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
