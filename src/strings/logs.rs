pub fn config_loaded(path: &str) -> String {
    format!("Loaded configuration from {path}")
}

pub const CONFIG_DEFAULTS: &str = "No configuration file found, using defaults";
pub const CONFIG_READ_ERROR: &str = "Failed to read configuration file";
pub const CONFIG_PARSE_ERROR: &str = "Failed to parse YAML";

pub fn env_override_ignored(key: &str, value: &str) -> String {
    format!("Ignoring unparsable value for {key}: {value:?}")
}

pub fn logged_in(user: &str) -> String {
    format!("Logged in as {user}")
}

pub fn setting_display_name(name: &str) -> String {
    format!("Setting display name to: {name}")
}

pub fn set_display_name_fail(err: &str) -> String {
    format!("Failed to set display name: {err}")
}

pub const SYNC_LOOP_START: &str = "Starting sync loop...";

pub fn sync_loop_fail(err: &str) -> String {
    format!("Sync loop failed: {err}")
}

pub const CONSOLE_START: &str = "Console transport ready, type a message and press enter";
pub const SHUTDOWN: &str = "Shutting down...";

pub fn shutdown_fail(err: &str) -> String {
    format!("Unable to listen for shutdown signal: {err}")
}

pub fn invite_received(room_id: &str) -> String {
    format!("💌 Received invite for room {room_id:?}")
}

pub fn join_invite_fail(err: &str) -> String {
    format!("Failed to join room after invite: {err}")
}

pub fn alias_overwritten(key: &str, previous: &str, next: &str) -> String {
    format!("Command key '{key}' was registered by '{previous}', now routed to '{next}'")
}

pub fn send_failed(err: &str) -> String {
    format!("Failed to send message: {err}")
}
