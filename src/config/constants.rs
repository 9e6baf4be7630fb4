/// Logical resource name shared by the synthesized descriptor, the build tool and the local
/// invoke tool. All three must address the same resource.
pub const TEMPLATE_RESOURCE_NAME: &str = "samlocalFunctionResource";

pub const ATTACH_TIMEOUT_SETTING: &str = "samcli.debug.attach.timeout.millis";
pub const SAM_CLI_LOCATION_SETTING: &str = "samcli.location";
pub const DEBUGGER_COMMAND_SETTING: &str = "samlocal.debugger.command";

pub const DEFAULT_ATTACH_TIMEOUT_MS: u64 = 30_000;
pub const ATTACH_POLL_INTERVAL_MS: u64 = 125;
pub const DEFAULT_SAM_CLI_BINARY: &str = "sam";

pub const GLOBAL_STATE_DIR: &str = ".samlocal";
pub const GLOBAL_SETTINGS_FILE_NAME: &str = "config.yaml";
pub const HANDLER_CONFIG_FILE_NAME: &str = "handlers.yaml";
