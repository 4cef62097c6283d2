use crate::model::DynamicPage;

/// Fixed set of URLs a menu item may point to, in display order.
///
/// Each internal page contributes `/` + slug. The editor treats this list as read-only.
#[derive(Clone, Debug, Default)]
pub struct LinkTargets {
    targets: Vec<LinkTarget>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkTarget {
    pub url: String,
    pub title: String,
}

impl LinkTargets {
    pub fn new<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = DynamicPage>,
    {
        let targets = pages
            .into_iter()
            .map(|page| LinkTarget {
                url: format!("/{}", page.slug.trim_start_matches('/')),
                title: page.title,
            })
            .collect();
        Self { targets }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinkTarget> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.position(url).is_some()
    }

    /// Page title for a URL, if it is one of the targets.
    pub fn title_for(&self, url: &str) -> Option<&str> {
        self.position(url).map(|idx| self.targets[idx].title.as_str())
    }

    /// Target after `url`, wrapping around. An unknown or empty URL selects the first target.
    pub fn next(&self, url: &str) -> Option<&LinkTarget> {
        let idx = self.position(url).map_or(0, |idx| (idx + 1) % self.targets.len());
        self.targets.get(idx)
    }

    /// Target before `url`, wrapping around. An unknown or empty URL selects the last target.
    pub fn prev(&self, url: &str) -> Option<&LinkTarget> {
        let len = self.targets.len();
        let idx = self
            .position(url)
            .map_or(len.checked_sub(1)?, |idx| (idx + len - 1) % len);
        self.targets.get(idx)
    }

    fn position(&self, url: &str) -> Option<usize> {
        self.targets.iter().position(|target| target.url == url)
    }
}
