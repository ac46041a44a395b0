use super::Compiler;
use crate::flow::NodeKind;
use crate::registry::ConfigurationResolver;
use ahash::AHashMap;

/// Collects the resolvers a [`Compiler`] dispatches to.
///
/// Registering a resolver for a kind that already has one replaces it.
#[derive(Default)]
pub struct CompilerBuilder<'r> {
    resolvers: AHashMap<NodeKind, &'r dyn ConfigurationResolver>,
    aliases: Vec<(NodeKind, NodeKind)>,
}

impl<'r> CompilerBuilder<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes nodes of `resolver.node_kind()` to `resolver`.
    pub fn with_resolver(mut self, resolver: &'r dyn ConfigurationResolver) -> Self {
        self.resolvers.insert(resolver.node_kind(), resolver);
        self
    }

    /// Lets nodes tagged `user_kind` reuse the resolver registered for `kind`.
    pub fn with_kind_alias(mut self, user_kind: &str, kind: NodeKind) -> Self {
        self.aliases.push((NodeKind::from(user_kind), kind));
        self
    }

    pub fn build(self) -> Compiler<'r> {
        let mut resolvers = self.resolvers;
        for (alias, target) in self.aliases {
            match resolvers.get(&target).copied() {
                Some(resolver) => {
                    resolvers.insert(alias, resolver);
                }
                None => tracing::warn!(
                    alias = %alias,
                    target = %target,
                    "kind alias points at a kind without a resolver; ignoring"
                ),
            }
        }
        Compiler { resolvers }
    }
}
