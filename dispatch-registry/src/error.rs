#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("handler already registered: command={command}")]
    AlreadyRegisteredCommand { command: &'static str },

    #[error("collaborator already registered: collaborator={collaborator}")]
    AlreadyRegisteredCollaborator { collaborator: &'static str },

    #[error("unresolved collaborator: {collaborator}")]
    UnresolvedCollaborator { collaborator: &'static str },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("handler: {0}")]
    Handler(#[from] anyhow::Error),
}
