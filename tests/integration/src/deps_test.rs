//! End-to-end dependency tree test over an on-disk fixture layout:
//! config loaded from TOML, mount-point and root-absolute includes, a
//! watch-listed pseudo-include and an unresolvable generated file.

use blk_deps::{DepNode, DepTreeBuilder, ResolverConfig};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(dir: &std::path::Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn find<'a>(node: &'a DepNode, name: &str) -> &'a DepNode {
    node.children
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("no child {name} under {}", node.name))
}

#[tokio::test]
async fn mission_fixture_builds_expected_tree() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write(
        root,
        "missions/assault.blk",
        r##"include "%weapons/rifle.blk"
include "#common/physics.blk"
include "shared/local.blk"
include "generated/runtime.blk"

entity {
  script:t = "behaviors/guard.blk"
}
"##,
    );
    write(root, "mounts/weapons/rifle.blk", "dmg:i = 42\n");
    write(root, "common/physics.blk", "gravity:r = 9.8\n");
    write(root, "missions/shared/local.blk", "fog:b = on\n");
    write(
        root,
        "develop/gameBase/behaviors/guard.blk",
        "alert:r = 0.5\n",
    );

    write(
        root,
        "blktool.toml",
        &format!(
            r#"root = "{root}"

[mount_points]
"%weapons" = "{root}/mounts/weapons"

[dependency_tree]
read_params = ["entity/script"]
"#,
            root = root.display()
        ),
    );

    let config = ResolverConfig::load(root.join("blktool.toml")).unwrap();
    let builder = DepTreeBuilder::new(config);
    let tree = builder.build(root.join("missions/assault.blk")).await;

    assert_eq!(tree.name, "assault.blk");
    assert_eq!(tree.children.len(), 5);

    assert!(find(&tree, "%weapons/rifle.blk").resolved_path.is_some());
    assert!(find(&tree, "#common/physics.blk").resolved_path.is_some());
    assert!(find(&tree, "shared/local.blk").resolved_path.is_some());
    assert!(find(&tree, "behaviors/guard.blk").resolved_path.is_some());

    let unresolved = find(&tree, "generated/runtime.blk");
    assert_eq!(unresolved.resolved_path, None);
    assert!(unresolved.children.is_empty());
}

#[tokio::test]
async fn tree_serializes_for_tooling_output() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "a.blk", "include \"b.blk\"\n");
    write(root, "b.blk", "x:i = 1\n");

    let config = ResolverConfig {
        root: Some(root.display().to_string()),
        ..Default::default()
    };
    let tree = DepTreeBuilder::new(config).build(root.join("a.blk")).await;

    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["name"], "a.blk");
    assert_eq!(json["children"][0]["name"], "b.blk");
    assert!(json["children"][0]["children"].as_array().unwrap().is_empty());
}
