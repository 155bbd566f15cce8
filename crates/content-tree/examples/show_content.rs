//! Builds a content tree for a small torrent and walks through a few edits
//!
//! Usage:
//!   RUST_LOG=debug cargo run --example show_content

use anyhow::{Context, Result};
use content_tree::prelude::*;

const FILES: &[(&str, u64)] = &[
    ("Series/Season 1/e01.mkv", 700_000_000),
    ("Series/Season 1/e02.mkv.!qB", 650_000_000),
    ("Series/Season 2/e01.mkv", 720_000_000),
    ("Series/subs/en.srt", 40_000),
    ("Series/README.txt", 1_200),
];

fn main() -> Result<()> {
    env_logger::init();

    let mut tree = ContentTree::from_files(FILES.iter().copied(), TreeOptions::default())?;
    print_tree("Loaded", &tree);

    let season2 = tree
        .find_by_path("Series/Season 2")
        .context("Season 2 folder is missing")?;
    tree.set_priority(season2, Priority::IGNORED);
    print_tree("Skipping season 2", &tree);

    let readme = tree
        .find_by_path("Series/README.txt")
        .context("README is missing")?;
    tree.set_priority(readme, Priority::HIGH);
    tree.update_files_progress(&[700_000_000, 325_000_000, 0, 40_000, 1_200])?;
    print_tree("After some progress", &tree);

    let series = tree.child(tree.root(), 0).context("tree is empty")?;
    for column in Column::ALL {
        println!("{:>10}: {:?}", tree.header(column), tree.data(series, column));
    }
    println!(
        "Selected {} of {} bytes done",
        tree.selected_done(),
        tree.selected_size()
    );

    Ok(())
}

fn print_tree(title: &str, tree: &ContentTree) {
    println!("{title}");
    println!("═══════════════════════════════");
    print!("{}", tree.render());
    println!();
}
