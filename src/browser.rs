//! Sequential browsing of a directory, skipping files that fail to decode.
//!
//! A [`Browser`] owns the file list of one directory and a cursor into it.
//! Each navigation command moves the cursor (with wraparound) and tries to
//! decode the file under it. A failed decode moves the cursor again in the
//! same direction; after every file of the directory has failed once the
//! session ends up in [`BrowseStatus::NoReadableFile`] instead of looping.

use std::path::{Path, PathBuf};

use crate::{Codec, Error, PixelGrid, decode_grid};

/// Lists the entries of a directory.
///
/// Order is whatever the implementation yields; the browser never re-sorts it.
pub trait DirectoryLister {
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>, Error>;
}

impl<F> DirectoryLister for F
where
    F: Fn(&Path) -> Result<Vec<PathBuf>, Error>,
{
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>, Error> {
        self(dir)
    }
}

/// Lists a directory on the file system, in OS enumeration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLister;

impl DirectoryLister for FsLister {
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>, Error> {
        let entries = std::fs::read_dir(dir).map_err(|e| Error::IoError(e.to_string()))?;
        entries
            .map(|entry| {
                entry
                    .map(|e| e.path())
                    .map_err(|e| Error::IoError(e.to_string()))
            })
            .collect()
    }
}

/// Turns a path into a pixel grid, or fails.
pub trait GridDecoder {
    fn try_decode(&mut self, path: &Path) -> Result<PixelGrid, Error>;
}

impl<F> GridDecoder for F
where
    F: FnMut(&Path) -> Result<PixelGrid, Error>,
{
    fn try_decode(&mut self, path: &Path) -> Result<PixelGrid, Error> {
        self(path)
    }
}

/// Decodes through a [`Codec`] and unmarshals the record.
#[derive(Debug, Clone, Default)]
pub struct CodecDecoder<C>(pub C);

impl<C: Codec> GridDecoder for CodecDecoder<C> {
    fn try_decode(&mut self, path: &Path) -> Result<PixelGrid, Error> {
        decode_grid(&self.0, path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowseStatus {
    /// No directory has been opened.
    #[default]
    Closed,
    /// The last decode succeeded and the cursor points at the shown file.
    Idle,
    /// A navigation command is retrying decodes.
    Stepping,
    /// Every file of the directory failed to decode. Only a new open leaves this state.
    NoReadableFile,
}

/// The file list and cursor of one browse session.
#[derive(Debug, Clone, Default)]
pub struct BrowseState {
    directory: PathBuf,
    files: Vec<PathBuf>,
    cursor: usize,
    direction: Direction,
    failure_count: usize,
    status: BrowseStatus,
}

impl BrowseState {
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    pub fn status(&self) -> BrowseStatus {
        self.status
    }

    pub fn current_path(&self) -> Option<&Path> {
        match self.status {
            BrowseStatus::Closed => None,
            _ => self.files.get(self.cursor).map(PathBuf::as_path),
        }
    }

    fn advance(&mut self) {
        let len = self.files.len();
        self.cursor = match self.direction {
            Direction::Forward => (self.cursor + 1) % len,
            Direction::Backward => (self.cursor + len - 1) % len,
        };
    }
}

/// Outcome of a navigation command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// A file decoded; show it.
    Shown { path: PathBuf, grid: PixelGrid },
    /// Nothing in the directory decodes.
    NoReadableFile { directory: PathBuf },
}

/// Walks a directory one readable image at a time.
pub struct Browser<L, D> {
    lister: L,
    decoder: D,
    state: BrowseState,
}

impl<L: DirectoryLister, D: GridDecoder> Browser<L, D> {
    pub fn new(lister: L, decoder: D) -> Self {
        Browser {
            lister,
            decoder,
            state: BrowseState::default(),
        }
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    /// Starts a session on `path`'s directory and shows `path`, or the next
    /// readable file after it.
    ///
    /// `path` must appear in its directory's listing. On error the previous
    /// session, if any, is left untouched.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<Navigation, Error> {
        let path = path.as_ref();

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let files = self.lister.list(&directory)?;

        // Every entry shares the same parent, so the file name identifies it.
        let cursor = files
            .iter()
            .position(|f| f.file_name() == path.file_name())
            .ok_or_else(|| Error::FileNotInDirectory(path.to_path_buf()))?;

        log::info!(
            "opened {} ({} entries)",
            directory.display(),
            files.len()
        );

        self.state = BrowseState {
            directory,
            files,
            cursor,
            direction: Direction::Forward,
            failure_count: 0,
            status: BrowseStatus::Stepping,
        };
        Ok(self.settle())
    }

    pub fn step_forward(&mut self) -> Result<Navigation, Error> {
        self.step(Direction::Forward)
    }

    pub fn step_backward(&mut self) -> Result<Navigation, Error> {
        self.step(Direction::Backward)
    }

    pub fn step(&mut self, direction: Direction) -> Result<Navigation, Error> {
        match self.state.status {
            BrowseStatus::Closed => return Err(Error::NoSession),
            BrowseStatus::NoReadableFile => {
                return Ok(Navigation::NoReadableFile {
                    directory: self.state.directory.clone(),
                });
            }
            BrowseStatus::Idle | BrowseStatus::Stepping => {}
        }

        self.state.direction = direction;
        self.state.status = BrowseStatus::Stepping;
        self.state.advance();
        Ok(self.settle())
    }

    /// Status line for the session: the shown file's name, or the exhaustion message.
    pub fn status_text(&self) -> String {
        match self.state.status {
            BrowseStatus::Idle => self
                .state
                .current_path()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            BrowseStatus::NoReadableFile => {
                Error::NoReadableFile(self.state.directory.clone()).to_string()
            }
            BrowseStatus::Closed | BrowseStatus::Stepping => String::new(),
        }
    }

    // Decodes at the cursor, moving on after each failure, at most once per file.
    fn settle(&mut self) -> Navigation {
        loop {
            let path = self.state.files[self.state.cursor].clone();
            match self.decoder.try_decode(&path) {
                Ok(grid) => {
                    self.state.failure_count = 0;
                    self.state.status = BrowseStatus::Idle;
                    return Navigation::Shown { path, grid };
                }
                Err(e) => {
                    self.state.failure_count += 1;
                    log::debug!("skipping {}: {e}", path.display());

                    if self.state.failure_count >= self.state.files.len() {
                        log::warn!(
                            "no readable image among {} entries of {}",
                            self.state.files.len(),
                            self.state.directory.display()
                        );
                        self.state.status = BrowseStatus::NoReadableFile;
                        return Navigation::NoReadableFile {
                            directory: self.state.directory.clone(),
                        };
                    }
                    self.state.advance();
                }
            }
        }
    }
}
