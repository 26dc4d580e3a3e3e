use async_std::fs::File;
use async_std::io::prelude::*;
use async_std::io::{BufReader, stdin};
use futures::FutureExt;
use futures::stream::{Stream, StreamExt, TryStreamExt};
use std::io::{Error, ErrorKind, Result};
use std::path::Path;

/// Reads a file by line
async fn file_lines(pathstr: String) -> Result<impl Stream<Item = Result<String>>> {
    let path = Path::new(&pathstr);
    if !path.exists() {
        return Err(Error::new(
            ErrorKind::NotFound,
            format!("The path does not exist: {pathstr}"),
        ));
    }
    if !path.is_file() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("The path is not a file: {pathstr}"),
        ));
    }
    let file = File::open(&pathstr).await?;
    Ok(BufReader::new(file).lines())
}

/// Reads lines of given file, or stdin if None
pub fn lines(path: Option<String>) -> impl Stream<Item = Result<String>> {
    if let Some(pathstr) = path {
        file_lines(pathstr).into_stream().try_flatten().left_stream()
    } else {
        BufReader::new(stdin()).lines().right_stream()
    }
}

/// Whole text of given file, or stdin if None, lines joined with `\n`
pub async fn read_text(path: Option<String>) -> Result<String> {
    let lines: Vec<String> = lines(path).try_collect().await?;
    Ok(lines.join("\n"))
}
