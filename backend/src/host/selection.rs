use common::requests::SelectElementsRequest;

/// Interactive element picking in the host application.
///
/// Runs on the host context, so implementations may block on operator input.
pub trait ElementPicker {
    /// Returns the unique ids of the picked elements, empty when the
    /// operator cancels.
    fn pick(&mut self, request: &SelectElementsRequest) -> Vec<String>;
}

/// Picker for hosts without an interactive selection surface. Always
/// returns an empty selection.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSelection;

impl ElementPicker for NoSelection {
    fn pick(&mut self, request: &SelectElementsRequest) -> Vec<String> {
        log::debug!(
            "Element selection requested ({:?}, categories {:?}): {}",
            request.count,
            request.allowed_categories,
            request.message
        );
        Vec::new()
    }
}
