use std::path::PathBuf;

use tracing::debug;

use super::error::SessionError;
use super::settings::Settings;

/// The on-disk session file. Read and written wholesale, never patched.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the session from disk; `Ok(None)` when no file exists
    pub fn load(&self) -> Result<Option<Settings>, SessionError> {
        if !self.exists() {
            debug!(path = %self.path.display(), "No session file");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|source| SessionError::Read {
            path: self.path.clone(),
            source,
        })?;
        let settings = serde_json::from_str(&contents).map_err(|source| SessionError::Parse {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), "Session file loaded");
        Ok(Some(settings))
    }

    /// Save the session to disk, replacing any previous content
    pub fn save(&self, settings: &Settings) -> Result<(), SessionError> {
        let write_err = |source| SessionError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let contents = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, contents).map_err(write_err)?;

        debug!(path = %self.path.display(), "Session file saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::settings::DeviceIdentity;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let file = SessionFile::new(dir.path().join("session.json"));

        assert!(!file.exists());
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let file = SessionFile::new(dir.path().join("nested").join("session.json"));

        let mut settings = Settings::with_device_identity(DeviceIdentity::from([(
            "uuid".to_string(),
            "abc".to_string(),
        )]));
        settings.authorization = Some("Bearer token".to_string());

        file.save(&settings).unwrap();
        assert!(file.exists());
        assert_eq!(file.load().unwrap(), Some(settings));
    }

    #[test]
    fn test_save_overwrites_previous_content() {
        let dir = TempDir::new().unwrap();
        let file = SessionFile::new(dir.path().join("session.json"));

        let mut first = Settings::default();
        first.user_id = Some("1".to_string());
        file.save(&first).unwrap();

        let second = Settings::default();
        file.save(&second).unwrap();

        assert_eq!(file.load().unwrap(), Some(second));
    }

    #[test]
    fn test_load_corrupt_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = SessionFile::new(&path).load().unwrap_err();
        assert!(matches!(err, SessionError::Parse { .. }));
        assert!(err.to_string().contains("session.json"));
    }

    #[test]
    fn test_directory_at_path_is_not_a_session() {
        let dir = TempDir::new().unwrap();
        let file = SessionFile::new(dir.path());

        assert!(!file.exists());
        assert!(file.load().unwrap().is_none());
    }
}
