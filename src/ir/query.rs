//! Link lookup by relation type.

use super::model::{Link, Xrd};

/// One relation type or a set of them.
///
/// Implemented for string types (a single relation) and for slices, arrays
/// and vectors of strings (any of several relations).
pub trait Relations {
    /// True if `rel` is one of the wanted relations.
    fn matches(&self, rel: &str) -> bool;
}

impl Relations for str {
    fn matches(&self, rel: &str) -> bool {
        self == rel
    }
}

impl Relations for String {
    fn matches(&self, rel: &str) -> bool {
        self == rel
    }
}

impl<S: AsRef<str>> Relations for [S] {
    fn matches(&self, rel: &str) -> bool {
        self.iter().any(|wanted| wanted.as_ref() == rel)
    }
}

impl<S: AsRef<str>, const N: usize> Relations for [S; N] {
    fn matches(&self, rel: &str) -> bool {
        self.as_slice().matches(rel)
    }
}

impl<S: AsRef<str>> Relations for Vec<S> {
    fn matches(&self, rel: &str) -> bool {
        self.as_slice().matches(rel)
    }
}

impl Xrd {
    /// Returns the first link, in document order, whose `rel` matches.
    ///
    /// ```
    /// use xrd::ir::{Link, Xrd};
    ///
    /// let xrd = Xrd::new()
    ///     .with_link(Link::new("http://webfinger.net/rel/avatar").with_href("http://example.com/a.png"))
    ///     .with_link(Link::new("http://webfinger.net/rel/profile-page").with_href("http://example.com/me"));
    ///
    /// let link = xrd.find_link("http://webfinger.net/rel/profile-page").unwrap();
    /// assert_eq!(link.href.as_deref(), Some("http://example.com/me"));
    ///
    /// let either = ["http://webfinger.net/rel/profile-page", "http://webfinger.net/rel/avatar"];
    /// assert_eq!(xrd.find_link(&either).unwrap().href.as_deref(), Some("http://example.com/a.png"));
    /// ```
    pub fn find_link<R: Relations + ?Sized>(&self, rels: &R) -> Option<&Link> {
        self.links
            .iter()
            .find(|link| link.rel.as_deref().is_some_and(|rel| rels.matches(rel)))
    }

    /// Mutable variant of [`Xrd::find_link`].
    pub fn find_link_mut<R: Relations + ?Sized>(&mut self, rels: &R) -> Option<&mut Link> {
        self.links
            .iter_mut()
            .find(|link| link.rel.as_deref().is_some_and(|rel| rels.matches(rel)))
    }

    /// Returns the named attribute of the first matching link.
    ///
    /// `None` if no link matches, or the matching link lacks the attribute.
    pub fn find_link_attr<R: Relations + ?Sized>(&self, rels: &R, attr: &str) -> Option<&str> {
        self.find_link(rels).and_then(|link| link.attr(attr))
    }
}
