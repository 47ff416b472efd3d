//! Command line parsing

use std::path::PathBuf;

use liftform_core::ExerciseType;

use crate::{ReplayError, ReplayResult};

pub const USAGE: &str =
    "usage: liftform-replay <exercise> <recording.jsonl> [--config cfg.json] [--record out.jsonl]";

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayArgs {
    pub exercise: ExerciseType,
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub record: Option<PathBuf>,
}

impl ReplayArgs {
    /// Parse arguments, excluding the program name
    pub fn parse<I>(args: I) -> ReplayResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut positional = Vec::new();
        let mut config = None;
        let mut record = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => config = Some(Self::value(&mut args, "--config")?),
                "--record" => record = Some(Self::value(&mut args, "--record")?),
                "-h" | "--help" => return Err(ReplayError::Usage(USAGE.to_string())),
                flag if flag.starts_with("--") => {
                    return Err(ReplayError::Usage(format!("unknown option {flag}\n{USAGE}")))
                }
                _ => positional.push(arg),
            }
        }

        let [exercise, input]: [String; 2] = positional
            .try_into()
            .map_err(|_| ReplayError::Usage(USAGE.to_string()))?;

        Ok(ReplayArgs {
            exercise: exercise.parse()?,
            input: PathBuf::from(input),
            config,
            record,
        })
    }

    fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> ReplayResult<PathBuf> {
        args.next()
            .map(PathBuf::from)
            .ok_or_else(|| ReplayError::Usage(format!("{flag} needs a path\n{USAGE}")))
    }
}
