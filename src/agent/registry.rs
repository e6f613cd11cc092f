use std::collections::BTreeMap;
use std::sync::Arc;

use super::descriptor::AgentDescriptor;

pub type AgentRegistry = BTreeMap<String, Arc<AgentDescriptor>>;

pub fn register_agent(descriptor: AgentDescriptor, registry: &mut AgentRegistry) -> Arc<AgentDescriptor> {
    let descriptor = Arc::new(descriptor);
    registry.insert(descriptor.name.clone(), Arc::clone(&descriptor));
    descriptor
}
