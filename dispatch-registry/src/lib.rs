pub mod collaborator;
pub mod collaborator_registry;
pub mod command;
pub mod command_bus;
pub mod decorate;
pub mod error;
pub mod handler;
pub mod inmemory_command_bus;

pub use collaborator_registry::CollaboratorRegistry;
pub use inmemory_command_bus::InMemoryCommandBus;
