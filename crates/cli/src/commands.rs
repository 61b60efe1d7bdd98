use std::{io::Write, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use greenlight_core::{
    collect_inputs, encode_movie, encode_movie_pretty, AppConfig, InputSource, Movie,
    MovieDecoder,
};
use tracing::{error, info};

/// Decode every input and write its wire form, one record per line.
pub fn normalize(
    config: &AppConfig,
    paths: &[PathBuf],
    pretty: bool,
    out: &mut impl Write,
) -> Result<()> {
    let decoder = MovieDecoder::from_config(&config.decode);
    for input in collect_inputs(paths)? {
        let movie = decode_input(&decoder, &input)?;
        let encoded = if pretty {
            encode_movie_pretty(&movie)?
        } else {
            encode_movie(&movie)?
        };
        writeln!(out, "{encoded}").context("failed to write output")?;
    }
    Ok(())
}

/// Decode every input and report the ones that fail.
pub fn check(config: &AppConfig, paths: &[PathBuf], out: &mut impl Write) -> Result<()> {
    let decoder = MovieDecoder::from_config(&config.decode);
    let inputs = collect_inputs(paths)?;
    let mut failures = 0usize;

    for input in &inputs {
        match decode_input(&decoder, input) {
            Ok(_) => writeln!(out, "ok      {input}")?,
            Err(err) => {
                failures += 1;
                error!("{err:#}");
                writeln!(out, "invalid {input}: {err:#}")?;
            }
        }
    }

    info!("checked {} input(s), {failures} invalid", inputs.len());
    if failures > 0 {
        return Err(anyhow!("{failures} of {} input(s) failed to decode", inputs.len()));
    }
    Ok(())
}

fn decode_input(decoder: &MovieDecoder, input: &InputSource) -> Result<Movie> {
    let body = input.read()?;
    decoder
        .decode(&body)
        .with_context(|| format!("failed to decode {input}"))
}
