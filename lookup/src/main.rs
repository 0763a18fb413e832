use std::error::Error;
use std::io::BufRead;
use std::path::PathBuf;

use lexdat::errors::LexdatError;
use lexdat::trie::WordEntry;
use lexdat::SharedEngine;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(
    name = "lookup",
    about = "A program to query and edit a compiled dictionary."
)]
struct Args {
    /// Store file, compiled from the dictionary if missing or stale.
    #[clap(short = 's', long)]
    store: PathBuf,

    /// Dictionary source, one `<level> <word>` per line.
    #[clap(short = 'd', long)]
    dict: PathBuf,

    /// Maximum number of words listed by prefix, suffix, and fuzzy.
    #[clap(short = 'l', long, default_value = "10")]
    limit: usize,
}

fn print_entries(entries: Vec<WordEntry>) {
    for e in entries {
        println!("{}\t{}", e.word, e.level);
    }
    println!("EOS");
}

fn run(engine: &SharedEngine, line: &str, limit: usize) -> Result<(), LexdatError> {
    let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        "match" => {
            let m = engine.exact_match(arg, false)?;
            println!("{}\t{}", arg, m.level);
        }
        "search" => {
            for m in engine.search(arg) {
                println!("{}\t{}\t{}\t{}", m.word, m.level, m.start, m.end);
            }
            println!("EOS");
        }
        "prefix" => print_entries(engine.prefix(arg, limit)?),
        "suffix" => print_entries(engine.suffix(arg, limit)?),
        "fuzzy" => print_entries(engine.fuzzy(arg, limit)?),
        "insert" => {
            let (level, word) = arg.split_once(' ').unwrap_or(("", arg));
            let Ok(level) = level.parse::<u8>() else {
                eprintln!("usage: insert <level> <word>");
                return Ok(());
            };
            let outcome = engine.insert(word, level)?;
            println!("{:?}", outcome);
        }
        "remove" => {
            engine.remove(arg)?;
            println!("Removed");
        }
        _ => log::warn!("unknown command: {:?}", command),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    eprintln!("Loading the store...");
    let engine = SharedEngine::initialize(&args.store, &args.dict)?;
    eprintln!("Ready to look up :)");

    #[allow(clippy::significant_drop_in_scrutinee)]
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if let Err(e) = run(&engine, line, args.limit) {
            eprintln!("{}", e);
        }
    }

    Ok(())
}
