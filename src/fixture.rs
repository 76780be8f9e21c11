//! The fixture tree built up during registration and walked by the runner.

use crate::test::{Captured, Expected};

/// Identifier of a fixture registered on a [`Runner`](crate::Runner).
///
/// Returned from the registration methods and accepted by the modifiers
/// such as [`Registry::skip`](crate::Registry::skip).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixtureId(pub(crate) usize);

/// The position a hook occupies in its suite's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Runs once, before the first child of the suite.
    SuiteSetup,
    /// Runs once, after the last child of the suite.
    SuiteTeardown,
    /// Runs before every test beneath the suite.
    Setup,
    /// Runs after every test beneath the suite.
    Teardown,
}

impl HookKind {
    /// The keyword the hook is reported under.
    pub fn name(self) -> &'static str {
        match self {
            HookKind::SuiteSetup => "suite_setup",
            HookKind::SuiteTeardown => "suite_teardown",
            HookKind::Setup => "setup",
            HookKind::Teardown => "teardown",
        }
    }
}

/// Context values passed to the body of a test or hook while it runs.
#[derive(Debug)]
pub struct Context<'a> {
    name: &'a str,
    skipped: bool,
}

impl<'a> Context<'a> {
    pub(crate) fn new(name: &'a str, skipped: bool) -> Self {
        Self { name, skipped }
    }

    /// The name of the fixture the body belongs to.
    #[inline]
    pub fn name(&self) -> &str {
        self.name
    }

    /// The skip flag of the fixture at the moment the body was invoked.
    ///
    /// A skipped test or hook body is never invoked, so this is `false`
    /// for the bodies the runner actually reaches.
    #[inline]
    pub fn skipped(&self) -> bool {
        self.skipped
    }
}

pub(crate) type HookBody = Box<dyn FnMut(&mut Context<'_>)>;
pub(crate) type TestBody = Box<dyn FnMut(&mut Context<'_>) -> Captured>;

pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) parent: Option<FixtureId>,
    pub(crate) skipped: bool,
    pub(crate) kind: NodeKind,
}

impl Node {
    #[inline]
    pub(crate) fn is_suite(&self) -> bool {
        matches!(self.kind, NodeKind::Suite(..))
    }
}

pub(crate) enum NodeKind {
    Suite(SuiteData),
    Test(TestData),
    Hook(HookData),
}

#[derive(Default)]
pub(crate) struct SuiteData {
    pub(crate) is_root: bool,
    pub(crate) children: Vec<FixtureId>,
    pub(crate) suite_setups: Vec<FixtureId>,
    pub(crate) suite_teardowns: Vec<FixtureId>,
    pub(crate) setups: Vec<FixtureId>,
    pub(crate) teardowns: Vec<FixtureId>,
}

pub(crate) struct TestData {
    pub(crate) body: TestBody,
    pub(crate) raises: Option<String>,
    pub(crate) returns: Option<Expected>,
}

pub(crate) struct HookData {
    pub(crate) body: HookBody,
    pub(crate) kind: HookKind,
}

/// Arena of every fixture known to a runner. The root suite always sits at
/// index zero.
pub(crate) struct Tree {
    pub(crate) nodes: Vec<Node>,
}

impl Tree {
    pub(crate) fn new() -> Self {
        let root = Node {
            name: "root".to_owned(),
            parent: None,
            skipped: false,
            kind: NodeKind::Suite(SuiteData {
                is_root: true,
                ..SuiteData::default()
            }),
        };
        Self { nodes: vec![root] }
    }

    #[inline]
    pub(crate) fn root(&self) -> FixtureId {
        FixtureId(0)
    }

    #[inline]
    pub(crate) fn name(&self, id: FixtureId) -> &str {
        &self.nodes[id.0].name
    }

    pub(crate) fn is_root(&self, id: FixtureId) -> bool {
        match &self.nodes[id.0].kind {
            NodeKind::Suite(data) => data.is_root,
            _ => false,
        }
    }

    #[inline]
    pub(crate) fn is_skipped(&self, id: FixtureId) -> bool {
        self.nodes[id.0].skipped
    }

    /// Marking is monotonic. A skipped fixture stays skipped for the
    /// lifetime of the runner.
    pub(crate) fn mark_skipped(&mut self, id: FixtureId) {
        self.nodes[id.0].skipped = true;
    }

    pub(crate) fn suite(&self, id: FixtureId) -> &SuiteData {
        match &self.nodes[id.0].kind {
            NodeKind::Suite(data) => data,
            _ => unreachable!(),
        }
    }

    pub(crate) fn suite_mut(&mut self, id: FixtureId) -> &mut SuiteData {
        match &mut self.nodes[id.0].kind {
            NodeKind::Suite(data) => data,
            _ => unreachable!(),
        }
    }

    pub(crate) fn hook_kind(&self, id: FixtureId) -> HookKind {
        match &self.nodes[id.0].kind {
            NodeKind::Hook(data) => data.kind,
            _ => unreachable!(),
        }
    }

    pub(crate) fn new_suite(&mut self, parent: FixtureId, name: &str) -> FixtureId {
        let id = self.push(Node {
            name: name.to_owned(),
            parent: Some(parent),
            skipped: false,
            kind: NodeKind::Suite(SuiteData::default()),
        });
        self.suite_mut(parent).children.push(id);
        id
    }

    pub(crate) fn new_test(&mut self, parent: FixtureId, desc: &str, body: TestBody) -> FixtureId {
        let id = self.push(Node {
            name: desc.to_owned(),
            parent: Some(parent),
            skipped: false,
            kind: NodeKind::Test(TestData {
                body,
                raises: None,
                returns: None,
            }),
        });
        self.suite_mut(parent).children.push(id);
        id
    }

    pub(crate) fn new_hook(
        &mut self,
        parent: FixtureId,
        kind: HookKind,
        body: HookBody,
    ) -> FixtureId {
        let id = self.push(Node {
            name: kind.name().to_owned(),
            parent: Some(parent),
            skipped: false,
            kind: NodeKind::Hook(HookData { body, kind }),
        });
        let suite = self.suite_mut(parent);
        match kind {
            HookKind::SuiteSetup => suite.suite_setups.push(id),
            HookKind::SuiteTeardown => suite.suite_teardowns.push(id),
            HookKind::Setup => suite.setups.push(id),
            HookKind::Teardown => suite.teardowns.push(id),
        }
        id
    }

    fn push(&mut self, node: Node) -> FixtureId {
        let id = FixtureId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Suites from the root down to `id`, inclusive.
    pub(crate) fn ancestor_chain(&self, id: FixtureId) -> Vec<FixtureId> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.nodes[current.0].parent;
        }
        chain.reverse();
        chain
    }

    pub(crate) fn set_raises(&mut self, id: FixtureId, pattern: String) {
        if let NodeKind::Test(data) = &mut self.nodes[id.0].kind {
            data.raises = Some(pattern);
        }
    }

    pub(crate) fn set_returns(&mut self, id: FixtureId, expected: Expected) {
        if let NodeKind::Test(data) = &mut self.nodes[id.0].kind {
            data.returns = Some(expected);
        }
    }
}
