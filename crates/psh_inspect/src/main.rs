// Scene file inspector
// Run with: cargo run --bin psh_inspect -- assets/sample.scene [--json]

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use psh_core::{
    import_into_host, import_scene, ImportSettings, MetadataRecord, SceneHost, SceneNode,
    Transform,
};
use psh_math::EulerRot;

const USAGE: &str = "Usage: psh_inspect <scene-file> [options]

Options:
  --scale <factor>       Uniform scale applied to the root (default 1.0)
  --search-path <dir>    Extra asset search path (repeatable)
  --settings <file>      Load import settings from a JSON file
  --trace                Log the XML document tree (with RUST_LOG=debug)
  --json                 Print the scene graph as JSON
  --ops                  Print the host operations the import performs";

#[derive(Debug, Default, PartialEq)]
struct Options {
    scene: PathBuf,
    settings_file: Option<PathBuf>,
    scale: Option<f32>,
    search_paths: Vec<String>,
    trace: bool,
    json: bool,
    ops: bool,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut options = Options::default();
        let mut scene = None;
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--scale" => {
                    let value = iter.next().context("--scale needs a value")?;
                    let scale = value
                        .parse::<f32>()
                        .with_context(|| format!("invalid scale '{}'", value))?;
                    options.scale = Some(scale);
                }
                "--search-path" => {
                    let value = iter.next().context("--search-path needs a value")?;
                    options.search_paths.push(value.clone());
                }
                "--settings" => {
                    let value = iter.next().context("--settings needs a file")?;
                    options.settings_file = Some(PathBuf::from(value));
                }
                "--trace" => options.trace = true,
                "--json" => options.json = true,
                "--ops" => options.ops = true,
                flag if flag.starts_with("--") => bail!("unknown option '{}'", flag),
                path => {
                    if scene.replace(PathBuf::from(path)).is_some() {
                        bail!("only one scene file can be inspected at a time");
                    }
                }
            }
        }

        options.scene = scene.context("missing scene file")?;
        Ok(options)
    }

    fn import_settings(&self) -> Result<ImportSettings> {
        let mut settings = match &self.settings_file {
            Some(path) => ImportSettings::from_json_file(path)
                .with_context(|| format!("failed to read settings {}", path.display()))?,
            None => ImportSettings::default(),
        };

        if let Some(scale) = self.scale {
            settings.scale = scale;
        }
        settings.asset_search_paths.extend(self.search_paths.iter().cloned());
        settings.trace |= self.trace;
        Ok(settings)
    }
}

/// Prints every host call instead of building engine objects.
#[derive(Default)]
struct PrintHost {
    names: Vec<String>,
}

impl SceneHost for PrintHost {
    type Handle = usize;

    fn create_node(&mut self, name: &str) -> usize {
        self.names.push(name.to_string());
        let handle = self.names.len() - 1;
        println!("create_node #{} '{}'", handle, name);
        handle
    }

    fn set_parent(&mut self, child: usize, parent: usize) {
        println!("set_parent #{} -> #{}", child, parent);
    }

    fn set_local_transform(&mut self, node: usize, transform: &Transform) {
        println!("set_local_transform #{} {}", node, format_transform(transform));
    }

    fn attach_metadata(&mut self, node: usize, record: MetadataRecord) {
        println!("attach_metadata #{} {}", node, format_record(&record));
    }
}

fn format_transform(transform: &Transform) -> String {
    let t = transform.translation;
    let (rx, ry, rz) = transform.rotation.to_euler(EulerRot::XYZ);
    let s = transform.scale;
    format!(
        "pos=({:.3}, {:.3}, {:.3}) rot=({:.1}, {:.1}, {:.1}) scale=({:.3}, {:.3}, {:.3})",
        t.x,
        t.y,
        t.z,
        rx.to_degrees(),
        ry.to_degrees(),
        rz.to_degrees(),
        s.x,
        s.y,
        s.z
    )
}

fn format_record(record: &MetadataRecord) -> String {
    let pairs: Vec<String> = record.iter().map(|(k, v)| format!("{}={:?}", k, v)).collect();
    format!("{{{}}}", pairs.join(", "))
}

fn print_node(node: &SceneNode, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{}{}  {}", indent, node.name, format_transform(&node.transform));
    for record in &node.metadata {
        println!("{}  | {}", indent, format_record(record));
    }
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    let options = Options::parse(&args)?;
    let settings = options.import_settings()?;
    log::info!("Inspecting {}", options.scene.display());

    if options.ops {
        let text = std::fs::read_to_string(&options.scene)
            .with_context(|| format!("failed to read {}", options.scene.display()))?;
        let name = options
            .scene
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed");
        let mut host = PrintHost::default();
        import_into_host(&text, name, &settings, &mut host)
            .with_context(|| format!("failed to import {}", options.scene.display()))?;
        return Ok(());
    }

    let scene = import_scene(&options.scene, &settings)
        .with_context(|| format!("failed to import {}", options.scene.display()))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&scene)?);
        return Ok(());
    }

    println!("=== Scene: {} ===", scene.root.name);
    println!("Nodes: {}", scene.root.node_count());
    println!("Metadata records: {}", scene.root.metadata_count());
    println!("Asset search paths: {:?}", scene.asset_search_paths);
    println!();
    print_node(&scene.root, 0);

    Ok(())
}
