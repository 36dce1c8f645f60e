use std::borrow::Cow;

/// An allocation-optimized string for metric names, tag keys, and tag values.
///
/// Static strings are carried by reference without allocating, while owned
/// strings are accepted anywhere a name or tag is expected.
pub type SharedString = Cow<'static, str>;

/// A key/value annotation attached to a metric emission.
///
/// Metrics are always identified by a path-like name, but can optionally carry
/// "tags", key/value pairs that provide dimensional metadata about the
/// emission. Backends typically use tags to break a single metric down by
/// context: which region served a request, which codepath was taken, and so
/// on.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct Tag(pub(crate) SharedString, pub(crate) SharedString);

impl Tag {
    /// Creates a [`Tag`] from a key and value.
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<SharedString>,
        V: Into<SharedString>,
    {
        Tag(key.into(), value.into())
    }

    /// Creates a [`Tag`] from a static key and value.
    pub const fn from_static_parts(key: &'static str, value: &'static str) -> Self {
        Tag(Cow::Borrowed(key), Cow::Borrowed(value))
    }

    /// Key of this tag.
    pub fn key(&self) -> &str {
        self.0.as_ref()
    }

    /// Value of this tag.
    pub fn value(&self) -> &str {
        self.1.as_ref()
    }

    /// Consumes this [`Tag`], returning the key and value.
    pub fn into_parts(self) -> (SharedString, SharedString) {
        (self.0, self.1)
    }
}

impl<K, V> From<&(K, V)> for Tag
where
    K: Into<SharedString> + Clone,
    V: Into<SharedString> + Clone,
{
    fn from(pair: &(K, V)) -> Tag {
        Tag::new(pair.0.clone(), pair.1.clone())
    }
}

impl From<&Tag> for Tag {
    fn from(tag: &Tag) -> Tag {
        tag.clone()
    }
}

/// A value that can be converted to [`Tag`]s.
pub trait IntoTags {
    /// Consumes this value, turning it into a vector of [`Tag`]s.
    fn into_tags(self) -> Vec<Tag>;
}

impl IntoTags for Vec<Tag> {
    fn into_tags(self) -> Vec<Tag> {
        self
    }
}

/// The empty tag set.
impl IntoTags for () {
    fn into_tags(self) -> Vec<Tag> {
        Vec::new()
    }
}

impl<T, G> IntoTags for &T
where
    Self: IntoIterator<Item = G>,
    G: Into<Tag>,
{
    fn into_tags(self) -> Vec<Tag> {
        self.into_iter().map(|t| t.into()).collect()
    }
}
