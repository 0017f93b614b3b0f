// src/downloader/writer.rs

use crate::{constants, error::*, utils};
use futures::{Stream, StreamExt};
use log::debug;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// First free path for `file_name` in `dir`, appending `_1`, `_2`, ... before
/// the extension while the name is taken.
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = utils::split_extension(file_name);
    let mut n: u32 = 1;
    loop {
        let candidate = dir.join(format!("{}_{}{}", stem, n, ext));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

fn write_chunk<W: Write>(writer: &mut W, chunk: &[u8], written: &mut u64) -> AppResult<()> {
    if chunk.is_empty() {
        return Ok(());
    }
    writer.write_all(chunk)?;
    *written += chunk.len() as u64;
    Ok(())
}

/// Streams a body into a collision-free file under `dir`.
///
/// `prefix` holds chunks already pulled off the stream (for signature
/// sniffing); they are written first. A failure leaves the partial file in
/// place and is reported as [`AppError::WriteFailure`].
pub async fn write_stream<S, B, E>(
    dir: &Path,
    file_name: &str,
    prefix: Vec<B>,
    stream: S,
) -> AppResult<PathBuf>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    AppError: From<E>,
{
    fs::create_dir_all(dir)?;
    let path = unique_path(dir, file_name);

    let result: AppResult<u64> = async {
        let mut stream = std::pin::pin!(stream);
        let mut writer = BufWriter::with_capacity(constants::WRITE_CHUNK_SIZE, File::create(&path)?);
        let mut written = 0u64;
        for chunk in &prefix {
            write_chunk(&mut writer, chunk.as_ref(), &mut written)?;
        }
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            write_chunk(&mut writer, chunk.as_ref(), &mut written)?;
        }
        writer.flush()?;
        Ok(written)
    }
    .await;

    match result {
        Ok(written) => {
            debug!("wrote {} bytes to {}", written, path.display());
            Ok(path)
        }
        Err(e) => Err(AppError::WriteFailure {
            path: path.display().to_string(),
            source: Box::new(e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunks(parts: &[&str]) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> + use<> {
        stream::iter(parts.iter().map(|p| Ok(p.as_bytes().to_vec())).collect::<Vec<_>>())
    }

    #[tokio::test]
    async fn test_same_name_twice_gets_suffix() {
        let dir = tempfile::tempdir().unwrap();

        let first = write_stream(dir.path(), "notes.pdf", Vec::<Vec<u8>>::new(), chunks(&["one"]))
            .await
            .unwrap();
        let second = write_stream(dir.path(), "notes.pdf", Vec::<Vec<u8>>::new(), chunks(&["two"]))
            .await
            .unwrap();

        assert_eq!(first, dir.path().join("notes.pdf"));
        assert_eq!(second, dir.path().join("notes_1.pdf"));
        assert_eq!(fs::read(&first).unwrap(), b"one");
        assert_eq!(fs::read(&second).unwrap(), b"two");
    }

    #[test]
    fn test_unique_path_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README"), b"x").unwrap();
        fs::write(dir.path().join("README_1"), b"x").unwrap();
        assert_eq!(unique_path(dir.path(), "README"), dir.path().join("README_2"));
    }

    #[tokio::test]
    async fn test_prefix_written_before_stream_and_empty_chunks_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("course");
        let path = write_stream(
            &target,
            "a.bin",
            vec![b"%PD".to_vec(), Vec::new()],
            chunks(&["F-1.4", "", " body"]),
        )
        .await
        .unwrap();
        assert_eq!(fs::read(path).unwrap(), b"%PDF-1.4 body");
    }

    #[tokio::test]
    async fn test_stream_error_keeps_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let body = stream::iter(vec![
            Ok(b"partial".to_vec()),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ]);
        let err = write_stream(dir.path(), "broken.zip", Vec::<Vec<u8>>::new(), body)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::WriteFailure { .. }));
        assert_eq!(fs::read(dir.path().join("broken.zip")).unwrap(), b"partial");
    }
}
