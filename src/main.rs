use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use treemask::{AttentionMask, EdgePolicy, MaskConfig, MaskStack, ParseTree, TreeMasker};

#[derive(Parser, Debug)]
#[command(name = "treemask", about = "Layer-wise attention masks from constituency parse trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct MaskArgs {
    /// Minimum number of mask layers.
    #[arg(long, default_value_t = treemask::DEFAULT_MIN_LAYER_DEPTH)]
    min_layer_depth: usize,
    /// Edge-removal policy: parent-height or self-height.
    #[arg(long, default_value = "parent-height")]
    policy: EdgePolicy,
    /// Attention heads of the consuming encoder.
    #[arg(long, default_value_t = treemask::DEFAULT_N_HEAD)]
    n_head: usize,
}

impl MaskArgs {
    fn masker(&self) -> Result<TreeMasker> {
        let config = MaskConfig::default()
            .with_min_layer_depth(self.min_layer_depth)
            .with_policy(self.policy)
            .with_n_head(self.n_head);
        TreeMasker::new(config).context("invalid mask configuration")
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize the mask stack of every tree in a file (one bracketed tree per line).
    Masks {
        /// Trees file.
        trees: PathBuf,
        #[command(flatten)]
        args: MaskArgs,
    },
    /// Show the attention groups of a single bracketed tree.
    Groups {
        /// Bracketed tree, e.g. "(S (NP (D the) (N dog)) (VP (V barked)))".
        tree: String,
        /// Only show this layer.
        #[arg(long)]
        layer: Option<usize>,
        #[command(flatten)]
        args: MaskArgs,
    },
    /// Write each tree's mask stack as one JSON line.
    #[cfg(feature = "visualize")]
    Export {
        /// Trees file.
        trees: PathBuf,
        #[command(flatten)]
        args: MaskArgs,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Masks { trees, args } => run_masks(trees, &args)?,
        Commands::Groups { tree, layer, args } => run_groups(&tree, layer, &args)?,
        #[cfg(feature = "visualize")]
        Commands::Export { trees, args } => run_export(trees, &args)?,
    }

    Ok(())
}

fn run_masks(trees_path: PathBuf, args: &MaskArgs) -> Result<()> {
    let masker = args.masker()?;

    let failed = for_each_stack(&trees_path, &masker, |line_no, stack| {
        let groups = stack
            .group_counts()
            .iter()
            .map(|count| count.to_string())
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "tree {}\tnodes={}\theight={}\tlayers={}\tgroups=[{}]\tfingerprint={}",
            line_no,
            stack.node_count(),
            stack.tree_height(),
            stack.layer_count(),
            groups,
            stack.fingerprint().to_hex()
        );
        Ok(())
    })?;

    if failed > 0 {
        bail!("{} tree(s) failed", failed);
    }
    Ok(())
}

fn run_groups(bracketed: &str, layer: Option<usize>, args: &MaskArgs) -> Result<()> {
    let masker = args.masker()?;
    let tree = ParseTree::from_bracketed(bracketed).context("failed to read tree")?;
    let stack = masker.build(&tree).context("mask construction failed")?;

    let layers = match layer {
        Some(layer) if layer >= stack.layer_count() => {
            bail!("layer {} out of range (stack has {})", layer, stack.layer_count())
        }
        Some(layer) => layer..layer + 1,
        None => 0..stack.layer_count(),
    };

    for layer in layers {
        let Some(mask) = stack.layer(layer) else {
            continue;
        };
        let groups = mask_groups(mask)
            .into_iter()
            .map(|members| {
                let entries = members
                    .iter()
                    .map(|&idx| format!("{}:{}", idx, stack.tags()[idx]))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("{{{}}}", entries)
            })
            .collect::<Vec<_>>()
            .join(" ");
        println!("layer {}\t{}", layer, groups);
    }

    Ok(())
}

#[cfg(feature = "visualize")]
fn run_export(trees_path: PathBuf, args: &MaskArgs) -> Result<()> {
    let masker = args.masker()?;
    let n_head = args.n_head;

    let failed = for_each_stack(&trees_path, &masker, |line_no, stack| {
        let json = stack
            .to_json(n_head)
            .with_context(|| format!("failed to serialize tree {}", line_no))?;
        println!("{}", json);
        Ok(())
    })?;

    if failed > 0 {
        bail!("{} tree(s) failed", failed);
    }
    Ok(())
}

/// Build a stack per non-empty line; failing trees are reported and skipped.
///
/// Returns the number of failed trees.
fn for_each_stack<F>(path: &PathBuf, masker: &TreeMasker, mut emit: F) -> Result<usize>
where
    F: FnMut(usize, &MaskStack) -> Result<()>,
{
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("failed to open trees file {}", path.display()))?,
    );

    let mut failed = 0;
    for (idx, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes.with_context(|| format!("failed to read {}", path.display()))?;
        let line_no = idx + 1;

        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(err) => {
                warn!(line = line_no, error = %err, "skipping undecodable line");
                eprintln!("tree {}\terror: {}", line_no, err);
                failed += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let stack = masker.build_bracketed(line.trim_end_matches('\r'));

        match stack {
            Ok(stack) => emit(line_no, &stack)?,
            Err(err) => {
                warn!(line = line_no, error = %err, "skipping tree");
                eprintln!("tree {}\terror: {}", line_no, err);
                failed += 1;
            }
        }
    }

    Ok(failed)
}

/// Members of each group, in order of lowest member
fn mask_groups(mask: &AttentionMask) -> Vec<Vec<usize>> {
    (0..mask.size())
        .filter(|&i| (0..i).all(|j| !mask.get(i, j)))
        .filter_map(|i| mask.row(i).map(|row| row.iter_ones().collect()))
        .collect()
}
