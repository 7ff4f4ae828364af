use std::path::PathBuf;

use clap::Parser;

/// Ember: a real-time animated ember face.
#[derive(Parser, Debug)]
#[command(name = "ember", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive override (e.g. `ember=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Icosphere subdivision level override (0-8).
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=8))]
    pub subdivisions: Option<u32>,

    /// Render this many frames without a window, log the stats and exit.
    #[arg(long, value_name = "FRAMES")]
    pub headless: Option<u32>,

    /// Print the commented default config and exit.
    #[arg(long)]
    pub print_default_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_windowed_run() {
        let args = Args::try_parse_from(["ember"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.headless.is_none());
        assert!(!args.print_default_config);
    }

    #[test]
    fn parses_every_flag() {
        let args = Args::try_parse_from([
            "ember",
            "--config",
            "/tmp/ember.toml",
            "--log-level",
            "ember=debug",
            "--subdivisions",
            "3",
            "--headless",
            "10",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/ember.toml")));
        assert_eq!(args.log_level.as_deref(), Some("ember=debug"));
        assert_eq!(args.subdivisions, Some(3));
        assert_eq!(args.headless, Some(10));
    }

    #[test]
    fn rejects_out_of_range_subdivisions() {
        assert!(Args::try_parse_from(["ember", "--subdivisions", "9"]).is_err());
    }
}
