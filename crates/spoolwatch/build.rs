use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;

#[path = "src/cli.rs"]
#[allow(dead_code)]
mod cli;

fn main() -> io::Result<()> {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let Some(out_dir) = std::env::var_os("OUT_DIR").map(PathBuf::from) else {
        return Err(io::Error::other("OUT_DIR is unset"));
    };
    let man_dir = out_dir.join("man");
    std::fs::create_dir_all(&man_dir)?;

    write_man_pages(cli::Cli::command(), &man_dir)
}

/// One page per visible command: `spoolwatch.1`, `spoolwatch-config.1`,
/// `spoolwatch-config-init.1`, ...
fn write_man_pages(root: clap::Command, man_dir: &Path) -> io::Result<()> {
    let mut pending = vec![root];

    while let Some(cmd) = pending.pop() {
        let page_name = cmd.get_name().to_owned();

        let mut page = Vec::new();
        clap_mangen::Man::new(cmd.clone()).render(&mut page)?;
        std::fs::write(man_dir.join(format!("{page_name}.1")), page)?;

        pending.extend(
            cmd.get_subcommands()
                .filter(|sub| !sub.is_hide_set())
                .map(|sub| sub.clone().name(format!("{page_name}-{}", sub.get_name()))),
        );
    }
    Ok(())
}
