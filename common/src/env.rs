use tracing::debug;

/// Is the code running inside a docker container?
///
/// Relies on `ENV RUNNINGINCONTAINER 1` being set in the dockerfile.
pub fn is_running_in_container() -> bool {
    std::env::var("RUNNINGINCONTAINER").map(|v| v == "1").unwrap_or(false)
}

/// Is the code running inside an ECS container in AWS?
///
/// ECS injects the task metadata endpoint into every container.
pub fn is_running_in_aws() -> bool {
    std::env::var("ECS_CONTAINER_METADATA_URI_V4")
        .map(|v| !v.is_empty())
        .unwrap_or(false)
}

/// Debug-log the runtime environment: container/AWS flags, the current
/// working directory and all environment variables.
pub fn log_environment() {
    debug!(
        in_container = is_running_in_container(),
        in_aws = is_running_in_aws(),
        "Environment info"
    );
    if let Ok(cwd) = std::env::current_dir() {
        debug!(cwd = %cwd.display(), "Current working directory");
    }
    log_environment_variables();
}

/// Log the current value of all environment variables.
///
/// Sensitive values are logged by length only.
pub fn log_environment_variables() {
    for (name, value) in std::env::vars() {
        if is_sensitive(&name) {
            debug!(name = %name, value_length = value.len(), "ENV (secret)");
        } else {
            debug!(name = %name, value = %value, "ENV");
        }
    }
}

fn is_sensitive(name: &str) -> bool {
    let name = name.to_lowercase();
    ["secret", "password", "token", "_key"]
        .iter()
        .any(|marker| name.contains(marker))
}
