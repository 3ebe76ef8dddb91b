// SPDX-License-Identifier: Unlicense
use std::{io::Read, path::Path};

use crate::{
    check,
    random::Generator,
    render::{render_infix, Parens},
    sexpr::parse_sexpr,
};
use anyhow::{anyhow, Result};

pub const SEED_VAR: &str = "BONSAI_SEED";

pub fn read_file(source: &Path) -> Result<String> {
    let mut buf = String::new();
    let mut f = std::fs::File::open(source)?;
    f.read_to_string(&mut buf)?;
    Ok(buf)
}

/// Reads a program from `arg`, where `-` means stdin.
pub fn read_source(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    read_file(Path::new(arg))
}

pub fn eval_source(src: &str) -> Result<String> {
    let expr = parse_sexpr(src)?;
    Ok(expr.eval()?.to_string())
}

pub fn render_source(src: &str) -> Result<String> {
    let expr = parse_sexpr(src)?;
    Ok(format!(
        "sexpr:  {}\ninfix:  {}\nlisp:   {}\nphrase: {}\nctor:   {}",
        expr.to_sexpr(),
        render_infix(&expr, Parens::Strict),
        render_infix(&expr, Parens::Minimal),
        expr.to_phrase(),
        expr.to_constructor(),
    ))
}

fn seed_from_env() -> Result<Option<u64>> {
    match std::env::var(SEED_VAR) {
        Ok(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow!("{} must be an unsigned integer: {}", SEED_VAR, e)),
        Err(_) => Ok(None),
    }
}

pub fn generate(depth: usize, count: usize, seed: Option<u64>) -> Result<String> {
    let mut generator = match seed {
        Some(s) => Generator::seeded(s),
        None => Generator::from_entropy(),
    };
    let mut lines = Vec::with_capacity(count);
    for _ in 0..count {
        lines.push(generator.generate(depth)?.to_sexpr());
    }
    Ok(lines.join("\n"))
}

pub fn generate_with_env_seed(depth: usize, count: usize) -> Result<String> {
    generate(depth, count, seed_from_env()?)
}

pub fn check_sources(reference: &str, candidate: &str) -> Result<String> {
    Ok(check::compare(reference, candidate).to_string())
}

/// Like [`check_sources`], with the candidate written in constructor form.
/// The reference must parse; a broken candidate is reported, not returned
/// as an error.
pub fn check_constructor_sources(reference: &str, candidate: &str) -> Result<String> {
    let reference = parse_sexpr(reference)?;
    Ok(check::compare_constructor(&reference, candidate).to_string())
}
