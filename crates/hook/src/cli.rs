use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "flacarr")]
#[command(about = "Lidarr hook: transcode lossless album downloads and re-import them", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, env = "FLACARR_CONFIG", default_value = "config.toml")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_config_flag() {
        let cli = Cli::try_parse_from(["flacarr", "--config", "/etc/flacarr.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/flacarr.toml"));
    }

    #[test]
    fn test_unknown_argument() {
        let err = Cli::try_parse_from(["flacarr", "--bitrate", "320"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_help_is_not_an_error_kind() {
        let err = Cli::try_parse_from(["flacarr", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
