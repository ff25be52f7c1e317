pub mod common;
pub mod lifecycle;
pub mod planning;

use crate::lifecycle::{LifecycleError, LifecycleNode};
use crate::planning::PlanningStack;

/// Core container for the planning process
pub struct PlanningCore {
    components: Vec<Box<dyn LifecycleNode>>,
}

impl PlanningCore {
    /// Create a new instance of PlanningCore
    pub fn new() -> Self {
        PlanningCore {
            components: Vec::new(),
        }
    }

    /// Register a component with the core
    pub fn register<T: LifecycleNode + 'static>(&mut self, component: T) {
        self.components.push(Box::new(component));
    }

    /// Initialize all registered components
    pub fn init(&mut self) -> Result<(), LifecycleError> {
        for component in &mut self.components {
            component.on_configure()?;
            component.on_activate()?;
        }
        Ok(())
    }

    /// Shutdown all registered components
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        for component in &mut self.components {
            component.on_deactivate()?;
            component.on_cleanup()?;
        }
        Ok(())
    }

    /// Get a mutable reference to the planning stack, if registered
    pub fn planning_stack_mut(&mut self) -> Option<&mut PlanningStack> {
        self.components
            .iter_mut()
            .find_map(|component| component.as_any_mut().downcast_mut::<PlanningStack>())
    }
}

impl Default for PlanningCore {
    fn default() -> Self {
        PlanningCore::new()
    }
}
