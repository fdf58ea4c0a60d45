//! Read command implementation.

use crate::error::CliError;
use crate::utils::{absent, parse_metapath, GlobalOptions, Session};
use clap::Args;
use metatree::{InheritOptions, NodeId, Reading, Tree};

/// Print the value or children at a metapath.
#[derive(Args)]
pub struct ReadCommand {
    /// Metapath to read, e.g. `/address/city`
    pub metapath: String,

    /// Resolve the value across the root and its ancestor directories
    #[arg(long)]
    pub inherit: bool,

    /// With --inherit, number of ancestors to consult (0 = all)
    #[arg(long, value_name = "N", default_value_t = 0, requires = "inherit")]
    pub depth: usize,
}

impl ReadCommand {
    /// Execute the read command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let metapath = parse_metapath(&self.metapath)?;
        let session = Session::open(global)?;

        let reading = if self.inherit {
            let mut tree = Tree::new();
            let mut node: NodeId = tree.add_location(&session.root)?;
            for part in metapath.parts() {
                node = tree.add_entry(part, Some(node))?;
            }
            let options = InheritOptions {
                depth: self.depth,
                ..InheritOptions::default()
            };
            session.store.inherit(&mut tree, node, options)?;
            if !tree.has_value(node) {
                return Err(absent(&metapath));
            }
            Reading::from_node(&tree, node)
        } else {
            session
                .store
                .read(&session.root, &metapath)?
                .ok_or_else(|| absent(&metapath))?
        };

        match reading {
            Reading::Value(value) => println!("{}", session.format_value(&value)?),
            Reading::Children(names) => {
                for name in names {
                    println!("{name}");
                }
            }
        }
        Ok(())
    }
}
