use sdkup_core::ReleaseNote;

use crate::Result;

/// Lists and fetches upstream release notes.
pub trait ReleaseSource: Send + Sync {
    /// Newest first, at most `per_page` items.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    fn list_releases(&self, repo: &str, per_page: u32) -> Result<Vec<ReleaseNote>>;

    /// # Errors
    ///
    /// Returns a not-found error for an unknown tag, or a transport error.
    fn release_by_tag(&self, repo: &str, tag: &str) -> Result<ReleaseNote>;

    /// # Errors
    ///
    /// Returns a not-found error if nothing is published, or a transport error.
    fn latest_release(&self, repo: &str) -> Result<ReleaseNote>;
}

impl<T: ReleaseSource + ?Sized> ReleaseSource for &T {
    fn list_releases(&self, repo: &str, per_page: u32) -> Result<Vec<ReleaseNote>> {
        (**self).list_releases(repo, per_page)
    }

    fn release_by_tag(&self, repo: &str, tag: &str) -> Result<ReleaseNote> {
        (**self).release_by_tag(repo, tag)
    }

    fn latest_release(&self, repo: &str) -> Result<ReleaseNote> {
        (**self).latest_release(repo)
    }
}
