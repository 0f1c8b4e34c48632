//! Font installation and removal on disk
//!
//! Every family gets its own directory under the scope's font root:
//! `<root>/<family>/<family>[-<style>]<ext>`.

use crate::config::FontfetchConfig;
use crate::http::{HttpBackend, ProgressFn};
use crate::{normalize_family_name, FontError, FontResult, FontScope, FontVariant};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extension assumed by single-variant removal. Variants stored in other
/// formats (e.g. `.otf`) are not found by [`FontInstaller::remove_variant`].
pub const REMOVAL_EXTENSION: &str = ".ttf";

/// Writes variants into font directories and removes them again
pub struct FontInstaller {
    backend: Arc<dyn HttpBackend>,
    config: FontfetchConfig,
}

impl FontInstaller {
    pub fn new(backend: Arc<dyn HttpBackend>, config: FontfetchConfig) -> Self {
        Self { backend, config }
    }

    /// Directory holding all files of `family` for `scope`
    pub fn family_dir(&self, family: &str, scope: FontScope) -> FontResult<PathBuf> {
        let family = checked_family(family)?;
        Ok(self.config.font_dir(scope)?.join(family))
    }

    /// Target path a variant is written to
    pub fn variant_path(&self, variant: &FontVariant, scope: FontScope) -> FontResult<PathBuf> {
        Ok(self
            .family_dir(&variant.family, scope)?
            .join(variant.file_name()))
    }

    /// Download `variant` into its family directory, creating it if needed.
    pub async fn download_variant(
        &self,
        variant: &FontVariant,
        scope: FontScope,
        progress: Option<&ProgressFn>,
    ) -> FontResult<PathBuf> {
        let dir = self.family_dir(&variant.family, scope)?;
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| denied_or_io(e, &dir))?;
        }

        let target = dir.join(variant.file_name());
        log::debug!(
            "Downloading {} -> {}",
            variant.source_url,
            target.display()
        );

        let bytes = self
            .backend
            .download_to(&variant.source_url, &target, progress)
            .await?;
        log::info!("Wrote {} bytes to {}", bytes, target.display());

        Ok(target)
    }

    /// Delete the whole family directory; returns the number of files removed.
    ///
    /// A missing family removes nothing and yields 0.
    pub fn remove_family(&self, name: &str, scope: FontScope) -> FontResult<usize> {
        let dir = self.family_dir(&normalize_family_name(name), scope)?;

        let count = match count_files(&dir) {
            Ok(count) => count,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        fs::remove_dir_all(&dir).map_err(|e| denied_or_io(e, &dir))?;
        log::info!("Removed {} ({} files)", dir.display(), count);
        Ok(count)
    }

    /// Delete `<family>-<style_token>.ttf`; returns whether a file was removed.
    pub fn remove_variant(&self, name: &str, style_token: &str, scope: FontScope) -> FontResult<bool> {
        let family = normalize_family_name(name);
        let path = self
            .family_dir(&family, scope)?
            .join(format!("{family}-{style_token}{REMOVAL_EXTENSION}"));

        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Removed {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(denied_or_io(e, &path)),
        }
    }
}

/// Reject family names that would escape the font root
fn checked_family(family: &str) -> FontResult<&str> {
    if family.is_empty()
        || family == "."
        || family == ".."
        || family.contains('/')
        || family.contains('\\')
    {
        return Err(FontError::InvalidFamilyName(family.to_string()));
    }
    Ok(family)
}

fn denied_or_io(err: std::io::Error, path: &Path) -> FontError {
    if err.kind() == ErrorKind::PermissionDenied {
        FontError::PermissionDenied(format!("Cannot modify {}", path.display()))
    } else {
        err.into()
    }
}

fn count_files(dir: &Path) -> std::io::Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            count += count_files(&entry.path())?;
        } else {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeBackend;
    use crate::StyleProperty;
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        user_root: PathBuf,
        system_root: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().expect("tempdir");
            let user_root = tmp.path().join("user");
            let system_root = tmp.path().join("system");
            Self {
                _tmp: tmp,
                user_root,
                system_root,
            }
        }

        fn installer(&self, backend: FakeBackend) -> FontInstaller {
            let config = FontfetchConfig::with_roots(
                self.user_root.clone(),
                self.system_root.clone(),
                self.user_root.join("config.json"),
            );
            FontInstaller::new(Arc::new(backend), config)
        }
    }

    fn variant(prop: StyleProperty, weight: &str, url: &str) -> FontVariant {
        FontVariant {
            family: "open-sans".to_string(),
            style_property: prop,
            weight: weight.to_string(),
            file_format: ".ttf".to_string(),
            source_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn downloads_into_family_directory() {
        let fx = Fixture::new();
        let installer = fx.installer(FakeBackend::new().with_body("https://fonts.test/b.ttf", b"bold".to_vec()));

        let path = installer
            .download_variant(
                &variant(StyleProperty::Bold, "bold", "https://fonts.test/b.ttf"),
                FontScope::User,
                None,
            )
            .await
            .expect("download");

        assert_eq!(path, fx.user_root.join("open-sans").join("open-sans-bold.ttf"));
        assert_eq!(fs::read(&path).expect("read"), b"bold");
    }

    #[tokio::test]
    async fn system_scope_uses_system_root() {
        let fx = Fixture::new();
        let installer = fx.installer(FakeBackend::new().with_body("https://fonts.test/l.ttf", b"x".to_vec()));

        let path = installer
            .download_variant(
                &variant(StyleProperty::Unclassified, "light", "https://fonts.test/l.ttf"),
                FontScope::System,
                None,
            )
            .await
            .expect("download");

        assert_eq!(path, fx.system_root.join("open-sans").join("open-sans.ttf"));
    }

    #[tokio::test]
    async fn failed_download_is_an_error() {
        let fx = Fixture::new();
        let installer = fx.installer(FakeBackend::new().with_status("https://fonts.test/r.ttf", 500));

        let result = installer
            .download_variant(
                &variant(StyleProperty::Regular, "regular", "https://fonts.test/r.ttf"),
                FontScope::User,
                None,
            )
            .await;

        assert!(matches!(result, Err(FontError::HttpStatus { status: 500, .. })));
        assert!(!fx.user_root.join("open-sans").join("open-sans-regular.ttf").exists());
    }

    #[test]
    fn remove_family_counts_files() {
        let fx = Fixture::new();
        let installer = fx.installer(FakeBackend::new());
        let dir = fx.user_root.join("open-sans");
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(dir.join("open-sans-regular.ttf"), b"r").expect("write");
        fs::write(dir.join("open-sans-bold.ttf"), b"b").expect("write");

        let removed = installer.remove_family("Open Sans", FontScope::User).expect("remove");

        assert_eq!(removed, 2);
        assert!(!dir.exists());
    }

    #[test]
    fn removing_missing_family_twice_yields_zero() {
        let fx = Fixture::new();
        let installer = fx.installer(FakeBackend::new());

        assert_eq!(installer.remove_family("nothing-here", FontScope::User).expect("first"), 0);
        assert_eq!(installer.remove_family("nothing-here", FontScope::User).expect("second"), 0);
    }

    #[test]
    fn remove_variant_assumes_ttf() {
        let fx = Fixture::new();
        let installer = fx.installer(FakeBackend::new());
        let dir = fx.user_root.join("open-sans");
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(dir.join("open-sans-italic.ttf"), b"i").expect("write");
        fs::write(dir.join("open-sans-regular.otf"), b"r").expect("write");

        assert!(installer
            .remove_variant("open-sans", "italic", FontScope::User)
            .expect("italic"));
        assert!(!installer
            .remove_variant("open-sans", "regular", FontScope::User)
            .expect("regular"));
        assert!(dir.join("open-sans-regular.otf").exists());
    }

    #[test]
    fn path_escaping_names_are_rejected() {
        let fx = Fixture::new();
        let installer = fx.installer(FakeBackend::new());

        for name in ["..", ".", "../etc", "a/b", ""] {
            assert!(
                matches!(
                    installer.remove_family(name, FontScope::User),
                    Err(FontError::InvalidFamilyName(_))
                ),
                "{name:?} should be rejected"
            );
        }
    }
}
