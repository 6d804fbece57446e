//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when running tests
//! or when the `test-support` feature is enabled.

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Write bytes to a file through `cap_std`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use auth_backend::test_support::cap_fs::write_file;
    ///
    /// let dir = tempfile::tempdir()?;
    /// write_file(&dir.path().join("users.json"), b"[]")?;
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

pub mod clock {
    //! Deterministic clock for expiry and last-login assertions.

    use std::sync::Mutex;

    use chrono::{DateTime, Local, TimeDelta, Utc};
    use mockable::Clock;

    /// Clock that only moves when told to.
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        /// Start the clock at `now`.
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        /// Move the clock forward by `seconds`.
        pub fn advance_seconds(&self, seconds: i64) {
            *self.lock_clock() += TimeDelta::seconds(seconds);
        }

        fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex"),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }
}

pub mod fixtures {
    //! User fixture files written to a temporary directory.

    use std::io;
    use std::path::PathBuf;

    use serde_json::Value;
    use tempfile::TempDir;

    use super::cap_fs::write_file;

    /// A fixture file that lives as long as this value.
    pub struct UserFixtureFile {
        _dir: TempDir,
        path: PathBuf,
    }

    impl UserFixtureFile {
        /// Serialise `users` into `users.json` inside a fresh temp directory.
        pub fn write(users: &Value) -> io::Result<Self> {
            let dir = tempfile::tempdir()?;
            let path = dir.path().join("users.json");
            let body = serde_json::to_vec_pretty(users).map_err(io::Error::other)?;
            write_file(&path, &body)?;
            Ok(Self { _dir: dir, path })
        }

        /// Location of the fixture file.
        pub fn path(&self) -> &std::path::Path {
            self.path.as_path()
        }
    }
}
