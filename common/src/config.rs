use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub enabled: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default)]
    pub environment_name: String,

    #[serde(default)]
    pub data_source_gas_root_url: String,
    #[serde(default)]
    pub data_source_gas_filenames: String,
    #[serde(default)]
    pub data_source_electricity_root_url: String,
    #[serde(default)]
    pub data_source_electricity_filenames: String,

    #[serde(default)]
    pub aws_s3_bucket_name: String,
    #[serde(default)]
    pub aws_access_key_id: String,
    #[serde(default)]
    pub aws_secret_access_key: String,
    #[serde(default)]
    pub aws_session_token: String,
    #[serde(default)]
    pub aws_sns_topic_arn: String,
    #[serde(default = "default_s3_region")]
    pub s3_region: String,
    #[serde(default)]
    pub s3_endpoint: String,

    #[serde(default)]
    pub delete_data_files: String,
    #[serde(default = "default_working_directory")]
    pub working_directory: String,

    #[serde(default)]
    pub warehouse_host: String,
    #[serde(default = "default_warehouse_port")]
    pub warehouse_port: u16,
    #[serde(default)]
    pub warehouse_user: String,
    #[serde(default)]
    pub warehouse_password: String,
    #[serde(default)]
    pub warehouse_database: String,
    #[serde(default = "default_warehouse_schema")]
    pub warehouse_schema: String,
    #[serde(default = "default_warehouse_table")]
    pub warehouse_table: String,
    #[serde(default)]
    pub warehouse_iam_role: String,
}

fn default_service_name() -> String {
    "energy-usage-elt".to_string()
}

fn default_s3_region() -> String {
    "eu-west-2".to_string()
}

fn default_working_directory() -> String {
    "data".to_string()
}

fn default_warehouse_port() -> u16 {
    5439
}

fn default_warehouse_schema() -> String {
    "beis_load".to_string()
}

fn default_warehouse_table() -> String {
    "energy_usage".to_string()
}

impl Settings {
    /// Load settings from the optional `config/app` file with environment
    /// variables layered on top.
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/app").required(false))
            .add_source(Environment::default().try_parsing(true));

        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;

        Ok(settings)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.eq_ignore_ascii_case("y")
    }

    pub fn cleanup_enabled(&self) -> bool {
        self.delete_data_files.eq_ignore_ascii_case("y")
    }

    pub fn warehouse_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.warehouse_user,
            self.warehouse_password,
            self.warehouse_host,
            self.warehouse_port,
            self.warehouse_database
        )
    }

    /// The external stage the warehouse loads from: everything under the
    /// processed-files prefix in the upload bucket.
    pub fn processed_stage_url(&self) -> String {
        format!("s3://{}/processed/", self.aws_s3_bucket_name)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: String::new(),
            service_name: default_service_name(),
            environment_name: String::new(),
            data_source_gas_root_url: String::new(),
            data_source_gas_filenames: String::new(),
            data_source_electricity_root_url: String::new(),
            data_source_electricity_filenames: String::new(),
            aws_s3_bucket_name: String::new(),
            aws_access_key_id: String::new(),
            aws_secret_access_key: String::new(),
            aws_session_token: String::new(),
            aws_sns_topic_arn: String::new(),
            s3_region: default_s3_region(),
            s3_endpoint: String::new(),
            delete_data_files: String::new(),
            working_directory: default_working_directory(),
            warehouse_host: String::new(),
            warehouse_port: default_warehouse_port(),
            warehouse_user: String::new(),
            warehouse_password: String::new(),
            warehouse_database: String::new(),
            warehouse_schema: default_warehouse_schema(),
            warehouse_table: default_warehouse_table(),
            warehouse_iam_role: String::new(),
        }
    }
}
