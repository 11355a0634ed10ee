use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use log::{error, info};
use polydict::DictionaryType;

use crate::error::AppError;
use crate::logger::initialize_logger;
use crate::report::{count_words, count_words_parallel};
use crate::text::TextProcessor;

mod error;
mod logger;
mod report;
mod text;

/// Which engines to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    One(DictionaryType),
    All,
}

impl Selection {
    fn kinds(self) -> Vec<DictionaryType> {
        match self {
            Selection::One(kind) => vec![kind],
            Selection::All => DictionaryType::ALL.to_vec(),
        }
    }
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Selection::All);
        }
        s.parse().map(Selection::One).map_err(|e| format!("{e}"))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Count word frequencies and compare dictionary engines")]
struct Args {
    /// Engine to use: avl|avltree, rbt|rbtree, chash|hashtable, ohash|openhashtable, or all
    structure: Selection,

    /// Text file to count
    input: PathBuf,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only list the N most frequent words
    #[arg(short, long, value_name = "N")]
    top: Option<usize>,
}

fn run(args: &Args) -> Result<(), AppError> {
    let text = TextProcessor::open(&args.input)?;

    let reports = match args.structure {
        Selection::One(kind) => vec![count_words(kind, &text)?],
        all => count_words_parallel(&all.kinds(), &text)?,
    };

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    for report in &reports {
        report.write_to(&mut out, args.top)?;
    }
    out.flush()?;

    if let Some(path) = &args.output {
        info!("report written to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    initialize_logger();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from(["wordfreq", "rbt", "book.txt"]).unwrap();
        assert_eq!(args.structure, Selection::One(DictionaryType::RedBlack));
        assert_eq!(args.input, PathBuf::from("book.txt"));
        assert_eq!(args.output, None);
        assert_eq!(args.top, None);

        let args =
            Args::try_parse_from(["wordfreq", "ALL", "in.txt", "-o", "out.txt", "--top", "10"])
                .unwrap();
        assert_eq!(args.structure, Selection::All);
        assert_eq!(args.output, Some(PathBuf::from("out.txt")));
        assert_eq!(args.top, Some(10));

        for (name, kind) in [
            ("avltree", DictionaryType::Avl),
            ("hashtable", DictionaryType::ChainedHash),
            ("openhashtable", DictionaryType::OpenHash),
        ] {
            let args = Args::try_parse_from(["wordfreq", name, "x"]).unwrap();
            assert_eq!(args.structure, Selection::One(kind));
        }

        assert!(Args::try_parse_from(["wordfreq", "btree", "x"]).is_err());
        assert!(Args::try_parse_from(["wordfreq", "avl"]).is_err());
    }

    #[test]
    fn test_selection_kinds() {
        assert_eq!(Selection::All.kinds(), DictionaryType::ALL.to_vec());
        assert_eq!(
            Selection::One(DictionaryType::OpenHash).kinds(),
            vec![DictionaryType::OpenHash]
        );
    }

    #[test]
    fn test_run_to_file() {
        let dir = std::env::temp_dir();
        let input = dir.join(format!("wordfreq-run-in-{}.txt", std::process::id()));
        let output = dir.join(format!("wordfreq-run-out-{}.txt", std::process::id()));
        std::fs::write(&input, "one two two three three three").unwrap();

        let args = Args {
            structure: Selection::All,
            input: input.clone(),
            output: Some(output.clone()),
            top: Some(1),
        };
        run(&args).unwrap();
        let report = std::fs::read_to_string(&output).unwrap();
        std::fs::remove_file(&input).unwrap();
        std::fs::remove_file(&output).unwrap();

        for kind in DictionaryType::ALL {
            assert!(report.contains(&format!("== {kind} ==")));
        }
        assert_eq!(report.matches("three: 3").count(), 4);
        assert!(!report.contains("one: 1"));
    }

    #[test]
    fn test_run_missing_input() {
        let args = Args {
            structure: Selection::One(DictionaryType::Avl),
            input: PathBuf::from("/nonexistent/wordfreq.txt"),
            output: None,
            top: None,
        };
        assert!(matches!(run(&args), Err(AppError::Input { .. })));
    }
}
