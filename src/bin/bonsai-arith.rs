// SPDX-License-Identifier: Unlicense
use anyhow::{anyhow, Result};
use bonsai_arith::driver;

const USAGE: &str = "usage:
  bonsai-arith eval <file|->
  bonsai-arith render <file|->
  bonsai-arith gen <depth> [count]
  bonsai-arith check [--constructor] <reference-file> <candidate-file>";

fn run(args: &[String]) -> Result<String> {
    let arg = |i: usize| args.get(i).ok_or(anyhow!("missing argument\n{}", USAGE));
    match args.first().map(String::as_str) {
        Some("eval") => driver::eval_source(&driver::read_source(arg(1)?)?),
        Some("render") => driver::render_source(&driver::read_source(arg(1)?)?),
        Some("gen") => {
            let depth = arg(1)?.parse()?;
            let count = match args.get(2) {
                Some(c) => c.parse()?,
                None => 1,
            };
            driver::generate_with_env_seed(depth, count)
        }
        Some("check") if args.get(1).map(String::as_str) == Some("--constructor") => {
            let reference = driver::read_source(arg(2)?)?;
            let candidate = driver::read_source(arg(3)?)?;
            driver::check_constructor_sources(&reference, &candidate)
        }
        Some("check") => {
            let reference = driver::read_source(arg(1)?)?;
            let candidate = driver::read_source(arg(2)?)?;
            driver::check_sources(&reference, &candidate)
        }
        _ => Err(anyhow!("{}", USAGE)),
    }
}

fn main() {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match run(&args) {
        Ok(v) => println!("{}", v),
        Err(v) => {
            eprintln!("error: {}", v);
            std::process::exit(1);
        }
    }
}
