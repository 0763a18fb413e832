use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use lexdat::Engine;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(
    name = "compile",
    about = "A program to compile a dictionary source into a store file."
)]
struct Args {
    /// Dictionary source, one `<level> <word>` per line.
    #[clap(short = 'd', long)]
    dict_in: PathBuf,

    /// File to which the compiled store is output.
    #[clap(short = 'o', long)]
    store_out: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    eprintln!("Compiling the dictionary...: {:?}", &args.dict_in);
    let start = Instant::now();
    let engine = Engine::compile(&args.store_out, &args.dict_in)?;
    eprintln!("{} seconds", start.elapsed().as_secs_f64());

    let trie = engine.trie();
    eprintln!(
        "Wrote {} words in {} slots ({} occupied) to {:?}",
        trie.num_words(),
        trie.size(),
        trie.num_nodes(),
        &args.store_out
    );

    Ok(())
}
