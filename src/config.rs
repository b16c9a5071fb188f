use std::path::PathBuf;

use getopts::Options;
use thiserror::Error;

use crate::data::store::DEFAULT_KEY;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("{0}")]
	Options(#[from] getopts::Fail),
	#[error("unexpected argument '{0}'")]
	Unexpected(String),
	#[error("no data directory found, pass one with --data-dir")]
	NoDataDir,
}

/// Runtime settings gathered from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Directory holding the notes slot
	pub data_dir: PathBuf,
	/// Key of the slot notes are stored under
	pub key: String,
	pub log_dir: PathBuf,
	/// Keep notes in memory, nothing is written to `data_dir`
	pub memory: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
	Run(Config),
	Help(String),
	Version,
}

fn options() -> Options {
	let mut opts = Options::new();
	opts.optopt("d", "data-dir", "directory notes are stored in", "DIR");
	opts.optopt("k", "key", "name of the notes slot", "KEY");
	opts.optopt("l", "log-dir", "directory for log files", "DIR");
	opts.optflag("m", "memory", "keep notes in memory only");
	opts.optflag("h", "help", "print this help");
	opts.optflag("V", "version", "print version");
	opts
}

pub fn usage(program: &str) -> String {
	options().usage(&format!("Usage: {program} [options]"))
}

fn default_data_dir() -> Option<PathBuf> {
	dirs::data_local_dir().map(|dir| dir.join("keepk"))
}

/// Parses `args`, the first element being the program name
pub fn parse(args: &[String]) -> Result<Command, ConfigError> {
	let program = args.first().map(String::as_str).unwrap_or("keepk");
	let matches = options().parse(args.iter().skip(1))?;

	if matches.opt_present("h") {
		return Ok(Command::Help(usage(program)));
	}
	if matches.opt_present("V") {
		return Ok(Command::Version);
	}
	if let Some(arg) = matches.free.first() {
		return Err(ConfigError::Unexpected(arg.clone()));
	}

	let data_dir = match matches.opt_str("d") {
		Some(dir) => PathBuf::from(dir),
		None => default_data_dir().ok_or(ConfigError::NoDataDir)?,
	};
	let log_dir = matches
		.opt_str("l")
		.map(PathBuf::from)
		.unwrap_or_else(|| data_dir.join("logs"));

	Ok(Command::Run(Config {
		key: matches.opt_str("k").unwrap_or_else(|| DEFAULT_KEY.into()),
		memory: matches.opt_present("m"),
		data_dir,
		log_dir,
	}))
}
