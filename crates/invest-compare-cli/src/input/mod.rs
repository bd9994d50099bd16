pub mod file;
pub mod stdin;

/// Resolve a request from `--input <file.json>`, then piped stdin, then the
/// individual flags via `from_flags`.
pub fn resolve<T, F>(input: Option<&str>, from_flags: F) -> Result<T, Box<dyn std::error::Error>>
where
    T: serde::de::DeserializeOwned,
    F: FnOnce() -> Result<T, Box<dyn std::error::Error>>,
{
    if let Some(path) = input {
        file::read_json(path)
    } else if let Some(value) = stdin::read_stdin()? {
        Ok(value)
    } else {
        from_flags()
    }
}
