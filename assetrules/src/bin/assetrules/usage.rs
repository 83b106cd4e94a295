use crate::commands::{normalize, provision, replay};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "normalize",
            groups: normalize::EXAMPLES,
        },
        CommandExample {
            name: "provision",
            groups: provision::EXAMPLES,
        },
        CommandExample {
            name: "replay",
            groups: replay::EXAMPLES,
        },
    ]
}
