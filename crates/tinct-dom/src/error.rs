//! DOM exceptions.

use thiserror::Error;

/// [WebIDL § 2.8.1 DOMException names](https://webidl.spec.whatwg.org/#idl-DOMException-error-names)
///
/// The subset of exception names the tree and range algorithms can throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomError {
    /// "The index is not in the allowed range."
    #[error("IndexSizeError: the index is not in the allowed range")]
    IndexSize,
    /// "The operation would yield an incorrect node tree."
    #[error("HierarchyRequestError: the operation would yield an incorrect node tree")]
    HierarchyRequest,
    /// "The object is in an invalid state."
    #[error("InvalidStateError: the object is in an invalid state")]
    InvalidState,
    /// "The supplied node is incorrect or has an incorrect ancestor for this operation."
    #[error("InvalidNodeTypeError: the supplied node is incorrect for this operation")]
    InvalidNodeType,
    /// "The object can not be found here."
    #[error("NotFoundError: the node does not belong to this tree")]
    NotFound,
}
