// Link input: list file, command line, or an interactive prompt

use std::io::{BufRead, Write};
use std::path::Path;

use tracing::debug;

use crate::config::RipperConfig;
use crate::downloader::errors::RipError;

/// One link per line; trailing whitespace trimmed, blank lines skipped
pub fn parse_link_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the link list file, `None` when it does not exist
pub fn read_link_list(path: &Path) -> Result<Option<Vec<String>>, RipError> {
    if !path.is_file() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)?;
    Ok(Some(parse_link_list(&text)))
}

/// Ask for a single link
pub fn prompt_link<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<String, RipError> {
    write!(writer, "YouTube Link: ")?;
    writer.flush()?;
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Links for this run: command line first, then the list file, then the
/// prompt.
pub fn collect_links<R: BufRead, W: Write>(
    config: &RipperConfig,
    reader: &mut R,
    writer: &mut W,
) -> Result<Vec<String>, RipError> {
    if !config.links.is_empty() {
        return Ok(config.links.clone());
    }

    if let Some(links) = read_link_list(&config.input_file)? {
        writeln!(
            writer,
            "Using {} for a list of YouTube links...",
            config.input_file.display()
        )?;
        debug!(count = links.len(), file = %config.input_file.display(), "links loaded");
        return Ok(links);
    }

    let link = prompt_link(reader, writer)?;
    Ok(if link.is_empty() { Vec::new() } else { vec![link] })
}

/// Block until a line is entered
pub fn wait_for_key<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<(), RipError> {
    writeln!(writer, "Press the 'any' key to exit")?;
    writer.flush()?;
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(())
}
