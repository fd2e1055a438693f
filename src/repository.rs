//! The file repository: everything a request layer can ask of the share.
//!
//! | Operation | Returns |
//! |---|---|
//! | [`list_files`](FileRepository::list_files) | every entry of a folder |
//! | [`get_file_paths`](FileRepository::get_file_paths) | logical paths of the folder's images |
//! | [`get_file`](FileRepository::get_file) | one image, resized |
//! | [`get_files`](FileRepository::get_files) | a batch of images, resized, all or nothing |
//! | [`get_random_files`](FileRepository::get_random_files) | a random batch from a folder |
//!
//! Folders are logical paths like image paths; an empty folder means the
//! configured default folder.

use crate::config::ServerConfig;
use crate::fetch::{FetchError, FetchOptions, fetch_many, fetch_one};
use crate::imaging::{DimensionRequest, ImageBackend, RustBackend, is_supported};
use crate::resolve::{join_logical, resolve};
use crate::sample::RandomSampler;
use crate::types::{File, ImageArtifact};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Read access to an image share rooted at one directory.
pub struct FileRepository<B: ImageBackend = RustBackend> {
    root: PathBuf,
    default_folder: String,
    options: FetchOptions,
    backend: B,
    sampler: RandomSampler,
}

impl FileRepository<RustBackend> {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_backend(root, RustBackend::new())
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.root)
            .default_folder(&config.default_folder)
            .options(FetchOptions {
                decode_mode: config.decode_mode(),
            })
    }
}

impl<B: ImageBackend> FileRepository<B> {
    pub fn with_backend(root: impl Into<PathBuf>, backend: B) -> Self {
        Self {
            root: root.into(),
            default_folder: String::new(),
            options: FetchOptions::default(),
            backend,
            sampler: RandomSampler::new(),
        }
    }

    pub fn default_folder(mut self, folder: impl Into<String>) -> Self {
        self.default_folder = folder.into();
        self
    }

    pub fn options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn sampler(mut self, sampler: RandomSampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn folder_or_default<'a>(&'a self, folder: &'a str) -> &'a str {
        if folder.is_empty() {
            &self.default_folder
        } else {
            folder
        }
    }

    /// Resolve a folder and read its entries, sorted by name.
    fn read_folder(&self, folder: &str) -> Result<Vec<(fs::DirEntry, fs::Metadata)>, FetchError> {
        let dir = resolve(&self.root, folder)?;
        let io_error = |source| FetchError::Io {
            path: folder.to_string(),
            source,
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let metadata = entry.metadata().map_err(io_error)?;
            entries.push((entry, metadata));
        }
        entries.sort_by_key(|(entry, _)| entry.file_name());
        Ok(entries)
    }

    /// Every entry of `folder`: files and subdirectories alike.
    #[instrument(level = "debug", skip(self))]
    pub fn list_files(&self, folder: &str) -> Result<Vec<File>, FetchError> {
        let folder = self.folder_or_default(folder);
        let files = self
            .read_folder(folder)?
            .into_iter()
            .map(|(entry, metadata)| {
                let name = entry.file_name().to_string_lossy().into_owned();
                File {
                    path: join_logical(folder, &name),
                    name,
                    size: metadata.len(),
                }
            })
            .collect();
        Ok(files)
    }

    /// Logical paths of the images directly inside `folder`.
    ///
    /// Only regular files with an allow-listed extension are returned;
    /// subdirectories are not descended into. Symlinks count by what they
    /// point at, and links leading out of the root are skipped, so every
    /// path returned can be fetched.
    #[instrument(level = "debug", skip(self))]
    pub fn get_file_paths(&self, folder: &str) -> Result<Vec<String>, FetchError> {
        let folder = self.folder_or_default(folder);
        let paths = self
            .read_folder(folder)?
            .into_iter()
            .filter(|(entry, _)| is_supported(&entry.path()))
            .map(|(entry, _)| join_logical(folder, &entry.file_name().to_string_lossy()))
            .filter(|logical| self.is_servable(logical))
            .collect();
        Ok(paths)
    }

    /// Whether `logical` resolves inside the root to a regular file.
    fn is_servable(&self, logical: &str) -> bool {
        match resolve(&self.root, logical) {
            Ok(path) => fs::metadata(path).is_ok_and(|m| m.is_file()),
            Err(e) => {
                debug!(path = logical, error = %e, "skipping entry");
                false
            }
        }
    }

    pub fn get_file(
        &self,
        path: &str,
        width: u32,
        height: u32,
    ) -> Result<ImageArtifact, FetchError> {
        fetch_one(
            &self.backend,
            &self.root,
            path,
            DimensionRequest::new(width, height),
            self.options,
        )
    }

    pub fn get_files<S>(
        &self,
        paths: &[S],
        width: u32,
        height: u32,
    ) -> Result<Vec<ImageArtifact>, FetchError>
    where
        S: AsRef<str> + Sync,
    {
        fetch_many(
            &self.backend,
            &self.root,
            paths,
            DimensionRequest::new(width, height),
            self.options,
        )
    }

    /// Up to `count` distinct images drawn at random from `folder`.
    ///
    /// Asking for more images than the folder holds returns all of them, in
    /// random order.
    #[instrument(level = "debug", skip(self))]
    pub fn get_random_files(
        &self,
        folder: &str,
        count: usize,
        width: u32,
        height: u32,
    ) -> Result<Vec<ImageArtifact>, FetchError> {
        let candidates = self.get_file_paths(folder)?;
        let selected = self.sampler.sample(&candidates, count);
        info!(
            available = candidates.len(),
            selected = selected.len(),
            "random selection"
        );
        self.get_files(&selected, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ResolveError;
    use crate::test_helpers::setup_library;
    use std::collections::HashSet;

    #[test]
    fn list_files_includes_everything_sorted() {
        let lib = setup_library();
        let repo = FileRepository::new(lib.path());
        let names: Vec<String> = repo
            .list_files("/photos")
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            names,
            [
                "album",
                "graphic.png",
                "landscape.jpg",
                "notes.txt",
                "portrait.jpg",
                "rotated.jpg"
            ]
        );
    }

    #[test]
    fn list_files_reports_logical_paths_and_sizes() {
        let lib = setup_library();
        let repo = FileRepository::new(lib.path());
        let files = repo.list_files("photos").unwrap();
        let notes = files.iter().find(|f| f.name == "notes.txt").unwrap();
        assert_eq!(notes.path, "/photos/notes.txt");
        assert_eq!(notes.size, "shopping list".len() as u64);
    }

    #[test]
    fn empty_folder_uses_default() {
        let lib = setup_library();
        let repo = FileRepository::new(lib.path()).default_folder("/damaged");
        let files = repo.list_files("").unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "/damaged/broken.jpg");
    }

    #[test]
    fn empty_default_folder_is_share_root() {
        let lib = setup_library();
        let repo = FileRepository::new(lib.path());
        let names: Vec<String> = repo.list_files("").unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, ["damaged", "photos"]);
    }

    #[test]
    fn list_missing_folder_fails() {
        let lib = setup_library();
        let repo = FileRepository::new(lib.path());
        assert!(matches!(
            repo.list_files("/nowhere"),
            Err(FetchError::NotFound(ResolveError::Missing { .. }))
        ));
    }

    #[test]
    fn listing_a_file_is_io_error() {
        let lib = setup_library();
        let repo = FileRepository::new(lib.path());
        assert!(matches!(
            repo.list_files("/photos/notes.txt"),
            Err(FetchError::Io { .. })
        ));
    }

    #[test]
    fn file_paths_only_lists_supported_images() {
        let lib = setup_library();
        let repo = FileRepository::new(lib.path());
        let paths = repo.get_file_paths("/photos").unwrap();
        assert_eq!(
            paths,
            [
                "/photos/graphic.png",
                "/photos/landscape.jpg",
                "/photos/portrait.jpg",
                "/photos/rotated.jpg"
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn file_paths_skip_links_that_cannot_be_served() {
        use std::os::unix::fs::symlink;

        let lib = setup_library();
        let outside = tempfile::TempDir::new().unwrap();
        std::fs::write(outside.path().join("s.jpg"), b"x").unwrap();
        let photos = lib.path().join("photos");
        symlink(outside.path().join("s.jpg"), photos.join("zz-link.jpg")).unwrap();
        symlink(photos.join("album"), photos.join("dir.jpg")).unwrap();
        symlink(photos.join("missing.jpg"), photos.join("dangling.jpg")).unwrap();
        symlink(photos.join("landscape.jpg"), photos.join("alias.jpg")).unwrap();

        let repo = FileRepository::new(lib.path());
        let paths = repo.get_file_paths("/photos").unwrap();
        assert_eq!(
            paths,
            [
                "/photos/alias.jpg",
                "/photos/graphic.png",
                "/photos/landscape.jpg",
                "/photos/portrait.jpg",
                "/photos/rotated.jpg"
            ]
        );

        let picked = repo.get_random_files("/photos", 100, 0, 0).unwrap();
        assert_eq!(picked.len(), 5);
    }

    #[test]
    fn file_paths_feed_back_into_get_files() {
        let lib = setup_library();
        let repo = FileRepository::new(lib.path());
        let paths = repo.get_file_paths("photos").unwrap();
        let artifacts = repo.get_files(&paths, 16, 16).unwrap();
        assert_eq!(artifacts.len(), paths.len());
        for (artifact, path) in artifacts.iter().zip(&paths) {
            assert_eq!(artifact.source_path(), path);
            assert_eq!((artifact.width(), artifact.height()), (16, 16));
        }
    }

    #[test]
    fn get_file_derives_missing_axis() {
        let lib = setup_library();
        let repo = FileRepository::new(lib.path());
        let artifact = repo.get_file("/photos/graphic.png", 15, 0).unwrap();
        assert_eq!((artifact.width(), artifact.height()), (15, 10));
    }

    #[test]
    fn huge_request_is_refused_not_allocated() {
        let lib = setup_library();
        let repo = FileRepository::new(lib.path());
        let err = repo.get_file("/photos/graphic.png", 0, u32::MAX).unwrap_err();
        assert!(matches!(err, FetchError::TooLarge { height: u32::MAX, .. }));
        assert_eq!(err.path(), "/photos/graphic.png");
    }

    #[test]
    fn get_files_fails_as_a_whole() {
        let lib = setup_library();
        let repo = FileRepository::new(lib.path());
        let result = repo.get_files(
            &["/photos/landscape.jpg", "/photos/notes.txt", "/photos/portrait.jpg"],
            0,
            0,
        );
        assert!(matches!(result, Err(FetchError::UnsupportedFormat { .. })));
    }

    #[test]
    fn random_files_are_distinct_members() {
        let lib = setup_library();
        let repo = FileRepository::new(lib.path()).sampler(RandomSampler::with_seed(3));
        let all: HashSet<String> = repo.get_file_paths("/photos").unwrap().into_iter().collect();

        let picked = repo.get_random_files("/photos", 3, 8, 8).unwrap();
        assert_eq!(picked.len(), 3);
        let unique: HashSet<&str> = picked.iter().map(|a| a.source_path()).collect();
        assert_eq!(unique.len(), 3);
        assert!(unique.iter().all(|p| all.contains(*p)));
        assert!(picked.iter().all(|a| (a.width(), a.height()) == (8, 8)));
    }

    #[test]
    fn random_count_is_clamped_to_available() {
        let lib = setup_library();
        let repo = FileRepository::new(lib.path());
        let picked = repo.get_random_files("/photos", 50, 0, 0).unwrap();
        assert_eq!(picked.len(), 4);
    }

    #[test]
    fn random_from_folder_without_images_is_empty() {
        let lib = setup_library();
        std::fs::create_dir(lib.path().join("empty")).unwrap();
        let repo = FileRepository::new(lib.path());
        assert!(repo.get_random_files("/empty", 3, 0, 0).unwrap().is_empty());
    }

    #[test]
    fn random_from_damaged_folder_fails() {
        let lib = setup_library();
        let repo = FileRepository::new(lib.path());
        assert!(matches!(
            repo.get_random_files("/damaged", 1, 0, 0),
            Err(FetchError::Decode { .. })
        ));
    }

    #[test]
    fn from_config_applies_settings() {
        let lib = setup_library();
        let config = ServerConfig {
            root: lib.path().to_path_buf(),
            default_folder: "/photos".into(),
            ..ServerConfig::default()
        };
        let repo = FileRepository::from_config(&config);
        assert_eq!(repo.root(), lib.path());
        assert_eq!(repo.get_file_paths("").unwrap().len(), 4);
    }

    #[test]
    fn custom_backend_is_used() {
        let lib = setup_library();
        let repo = FileRepository::with_backend(lib.path(), RustBackend::new());
        assert!(repo.get_file("/photos/landscape.jpg", 0, 0).is_ok());
    }
}
