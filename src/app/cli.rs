#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Invoke,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "invoke" => CliVerb::Invoke,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  invoke [options]                     Build and run one handler locally".to_string(),
        "  help                                 Show this help".to_string(),
        String::new(),
        "Invoke options:".to_string(),
        "  --document <path>                    Source file that declares the handler"
            .to_string(),
        "  --handler <name>                     Handler identifier, e.g. app.handler".to_string(),
        "  --runtime <runtime>                  Lambda runtime, e.g. nodejs20.x".to_string(),
        "  --code-root <dir>                    Directory used as CodeUri and build base"
            .to_string(),
        "  --workspace <dir>                    Project root for handler config and templates"
            .to_string(),
        "  --manifest <path>                    Dependency manifest passed to the build"
            .to_string(),
        "  --debug-port <port>                  Start under a debugger listening on <port>"
            .to_string(),
        "  --config <path>                      Settings file (default ~/.samlocal/config.yaml)"
            .to_string(),
        "  --log-file <path>                    Log file (default ~/.samlocal/logs/samlocal.log)"
            .to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}
