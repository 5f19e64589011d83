use crate::prompt::Prompter;

/// What the session does once a handler has returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Done,
    Exit,
}

/// Anything a menu can run against: it must be able to ask questions.
pub trait Context {
    fn prompter(&mut self) -> &mut dyn Prompter;
}

pub type Handler<C> = Box<dyn Fn(&mut C) -> anyhow::Result<Flow>>;

pub enum Node<C> {
    Action { name: String, handler: Handler<C> },
    Submenu { name: String, children: Vec<Node<C>> },
}

impl<C> Node<C> {
    pub fn action(
        name: impl Into<String>,
        handler: impl Fn(&mut C) -> anyhow::Result<Flow> + 'static,
    ) -> Self {
        Self::Action {
            name: name.into(),
            handler: Box::new(handler),
        }
    }

    pub fn submenu(name: impl Into<String>, children: Vec<Node<C>>) -> Self {
        Self::Submenu {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Action { name, .. } | Self::Submenu { name, .. } => name.as_str(),
        }
    }
}

/// A titled list of nodes. Running it asks for one choice, descends through
/// submenus, and returns what the chosen handler returned.
pub struct Menu<C> {
    title: String,
    nodes: Vec<Node<C>>,
}

impl<C: Context> Menu<C> {
    pub fn new(title: impl Into<String>, nodes: Vec<Node<C>>) -> Self {
        Self {
            title: title.into(),
            nodes,
        }
    }

    pub fn run(&self, ctx: &mut C) -> anyhow::Result<Flow> {
        let mut title = self.title.as_str();
        let mut nodes = &self.nodes;
        loop {
            let names = nodes
                .iter()
                .map(|node| node.name().to_string())
                .collect::<Vec<String>>();
            let choice = ctx.prompter().select(title, &names)?;
            match &nodes[choice] {
                Node::Action { name, handler } => {
                    tracing::debug!("running '{name}'");
                    return handler(ctx);
                }
                Node::Submenu { name, children } => {
                    title = name.as_str();
                    nodes = children;
                }
            }
        }
    }
}
