/// One fetched tweet, reduced to what the store persists.
///
/// The identifier is the API's stable post id and is the merge key:
/// storing two tweets with the same identifier keeps the later text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tweet {
    pub identifier: String,
    pub text: String,
}

impl Tweet {
    pub fn new(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            text: text.into(),
        }
    }
}
