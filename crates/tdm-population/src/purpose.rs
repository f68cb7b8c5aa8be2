//! Trip purpose registry.

use tdm_core::PurposeId;

/// Ordered purpose names; a purpose's position is its [`PurposeId`].
///
/// The same registry labels size-term columns and model-spec segments, so
/// a `PurposeId` means the same thing everywhere in a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Purposes {
    names: Vec<String>,
}

impl Purposes {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self { names: names.into_iter().map(Into::into).collect() }
    }

    pub fn id(&self, name: &str) -> Option<PurposeId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| PurposeId(i as u16))
    }

    /// Name of `id`; `"?"` for ids outside the registry.
    pub fn name(&self, id: PurposeId) -> &str {
        self.names.get(id.index()).map_or("?", String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = PurposeId> + '_ {
        (0..self.names.len() as u16).map(PurposeId)
    }
}
