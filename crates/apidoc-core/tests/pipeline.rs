//! Integration tests for building a documentation graph from two sources

use std::collections::BTreeSet;
use std::io::Write;

use pretty_assertions::assert_eq;

use apidoc_core::model::{ArgDoc, PrettyOptions, Tristate};
use apidoc_core::{
    ApidocConfig, DocArena, DocBuilder, DocInheriter, DocMerger, DottedName, SourcePair, ValueDoc,
    ValueId, VarId, VariableDoc,
};

const CONFIG: &str = r#"
[inherit]
inherit-descriptions = true

[[namespace]]
name = "shapes.Circle"
sort = ["radius", "*"]

[[namespace.groups]]
name = "Geometry"
members = ["area", "radius"]

[[namespace.groups]]
name = "Private"
members = ["_*"]
"#;

/// Both views of a small `shapes` module
struct Shapes {
    arena: DocArena,
    introspected: ValueId,
    parsed: ValueId,
    shape: ValueId,
    circle: ValueId,
    helper: ValueId,
    shape_area: VarId,
    default_parsed: ValueId,
}

fn name(s: &str) -> DottedName {
    DottedName::parse(s).unwrap()
}

fn shapes() -> Shapes {
    let mut arena = DocArena::new();

    // Introspected side
    let introspected = arena.add_value(ValueDoc::module().with_name(name("shapes")));
    let shape = arena.add_value(ValueDoc::class(Some(Vec::new())));
    let area = arena.add_value(ValueDoc::routine(Vec::new()));
    let shape_area = arena.add_member(
        shape,
        VariableDoc::new("area")
            .with_value(area)
            .with_descr("Area of the shape."),
    );
    let cache = arena.add_value(ValueDoc::generic().with_repr("{}"));
    arena.add_member(shape, VariableDoc::new("_cache").with_value(cache));

    let circle = arena.add_value(ValueDoc::class(Some(vec![shape])));
    let circle_area = arena.add_value(ValueDoc::routine(Vec::new()));
    arena.add_member(circle, VariableDoc::new("area").with_value(circle_area));
    let describe = arena.add_value(ValueDoc::routine(Vec::new()));
    arena.add_member(circle, VariableDoc::new("describe").with_value(describe));

    let default_introspected = arena.add_value(ValueDoc::generic().with_repr("1"));
    let helper_args = vec![ArgDoc::new("x", Some(default_introspected))];
    let helper = arena.add_value(ValueDoc::routine(helper_args));
    let path = arena.add_value(ValueDoc::module());

    arena.add_member(introspected, VariableDoc::new("Shape").with_value(shape));
    arena.add_member(introspected, VariableDoc::new("Circle").with_value(circle));
    arena.add_member(introspected, VariableDoc::new("helper").with_value(helper));
    arena.add_member(introspected, VariableDoc::new("path").with_value(path));

    // Parsed side
    let parsed = arena.add_value(ValueDoc::module().with_docstring("Geometric shapes."));
    let shape_parsed =
        arena.add_value(ValueDoc::class(Some(Vec::new())).with_docstring("Base shape."));
    let area_parsed =
        arena.add_value(ValueDoc::routine(Vec::new()).with_docstring("Compute the area."));
    arena.add_member(shape_parsed, VariableDoc::new("area").with_value(area_parsed));

    let circle_parsed = arena.add_value(ValueDoc::class(Some(vec![shape_parsed])));
    let radius = arena.add_value(ValueDoc::generic());
    arena.add_member(
        circle_parsed,
        VariableDoc::new("radius")
            .with_value(radius)
            .with_instvar(true)
            .with_docstring("Distance from the center."),
    );

    let default_parsed = arena.add_value(ValueDoc::generic().with_repr("1"));
    let helper_args = vec![ArgDoc::new("x", Some(default_parsed))];
    let helper_parsed = arena.add_value(ValueDoc::routine(helper_args));

    let confirmed = [
        ("Shape", shape_parsed),
        ("Circle", circle_parsed),
        ("helper", helper_parsed),
    ];
    for (member, value) in confirmed {
        let var = VariableDoc::new(member).with_value(value).with_imported(false);
        arena.add_member(parsed, var);
    }

    Shapes {
        arena,
        introspected,
        parsed,
        shape,
        circle,
        helper,
        shape_area,
        default_parsed,
    }
}

fn build(fixture: &mut Shapes) -> Vec<ValueId> {
    let config = ApidocConfig::parse(CONFIG).unwrap();
    DocBuilder::new(config).build(
        &mut fixture.arena,
        &[SourcePair::new(Some(fixture.introspected), Some(fixture.parsed))],
    )
}

fn names(arena: &DocArena, vars: &[VarId]) -> Vec<String> {
    vars.iter().map(|&var| arena.variable(var).name.clone()).collect()
}

#[test]
fn test_build_merges_both_sources() {
    let mut fixture = shapes();
    let roots = build(&mut fixture);
    let arena = &fixture.arena;

    assert_eq!(roots, vec![fixture.introspected]);
    let module = arena.value(fixture.introspected);
    assert_eq!(module.docstring.as_deref(), Some("Geometric shapes."));
    assert_eq!(arena.value(fixture.shape).docstring.as_deref(), Some("Base shape."));

    let area = arena.member_value(fixture.shape, "area").unwrap();
    assert_eq!(arena.value(area).docstring.as_deref(), Some("Compute the area."));

    let helper = arena.value(fixture.helper).as_routine().unwrap();
    assert_eq!(helper.args[0].default, Some(fixture.default_parsed));

    let path = arena.member(fixture.introspected, "path").unwrap();
    assert_eq!(arena.variable(path).is_imported, Tristate::Yes);
    let shape_var = arena.member(fixture.introspected, "Shape").unwrap();
    assert_eq!(arena.variable(shape_var).is_imported, Tristate::No);
}

#[test]
fn test_build_assigns_canonical_names() {
    let mut fixture = shapes();
    build(&mut fixture);
    let arena = &fixture.arena;

    let canonical = |id: ValueId| arena.value(id).canonical_name.as_ref().map(ToString::to_string);
    assert_eq!(canonical(fixture.circle).as_deref(), Some("shapes.Circle"));
    assert_eq!(canonical(fixture.helper).as_deref(), Some("shapes.helper"));

    let radius = arena.member_value(fixture.circle, "radius").unwrap();
    assert_eq!(canonical(radius).as_deref(), Some("shapes.Circle.radius"));

    // Imported members do not name their values
    let path = arena.member_value(fixture.introspected, "path").unwrap();
    assert_eq!(canonical(path), None);
}

#[test]
fn test_instance_variables_join_the_class() {
    let mut fixture = shapes();
    build(&mut fixture);
    let arena = &fixture.arena;

    let class = arena.value(fixture.circle).as_class().unwrap();
    let radius = class.local_variables["radius"];
    assert!(arena.variable(radius).is_instvar.is_yes());
    assert_eq!(
        arena.variable(radius).docstring.as_deref(),
        Some("Distance from the center.")
    );
}

#[test]
fn test_inheritance_is_complete_and_overrides_win() {
    let mut fixture = shapes();
    build(&mut fixture);
    let arena = &fixture.arena;

    let ancestor = arena.value(fixture.shape).as_class().unwrap();
    let circle = arena.value(fixture.circle).namespace_doc().unwrap();
    for name in ancestor.local_variables.keys() {
        assert!(circle.variables.contains_key(name), "missing inherited member {name}");
    }

    let own_area = arena.member(fixture.circle, "area").unwrap();
    assert!(!arena.variable(own_area).is_inherited);
    assert_eq!(arena.variable(own_area).overrides(), Some(fixture.shape_area));
    assert_eq!(arena.variable(own_area).descr.as_deref(), Some("Area of the shape."));

    let cache = arena.member(fixture.circle, "_cache").unwrap();
    assert!(arena.variable(cache).is_inherited);
    assert_eq!(
        arena.variable(cache).value,
        arena.member_value(fixture.shape, "_cache")
    );
}

#[test]
fn test_configured_sort_and_groups() {
    let mut fixture = shapes();
    build(&mut fixture);
    let arena = &fixture.arena;

    let ns = arena.value(fixture.circle).namespace_doc().unwrap();
    assert_eq!(names(arena, &ns.sorted_variables), vec!["radius", "_cache", "area", "describe"]);
    assert_eq!(ns.group_names, vec!["", "Geometry", "Private"]);
    assert_eq!(names(arena, &ns.groups[""]), vec!["describe"]);
    assert_eq!(names(arena, &ns.groups["Geometry"]), vec!["radius", "area"]);
    assert_eq!(names(arena, &ns.groups["Private"]), vec!["_cache"]);
}

#[test]
fn test_sorted_members_partition_into_groups() {
    let mut fixture = shapes();
    let roots = build(&mut fixture);
    let arena = &fixture.arena;

    for id in arena.reachable_values(&roots) {
        let Some(ns) = arena.value(id).namespace_doc() else {
            continue;
        };
        let declared: BTreeSet<VarId> = ns.variables.values().copied().collect();
        let sorted: BTreeSet<VarId> = ns.sorted_variables.iter().copied().collect();
        assert_eq!(sorted, declared);
        assert_eq!(ns.sorted_variables.len(), declared.len());

        let mut grouped: Vec<VarId> = ns.groups.values().flatten().copied().collect();
        grouped.sort();
        let mut expected = ns.sorted_variables.clone();
        expected.sort();
        assert_eq!(grouped, expected);
    }
}

#[test]
fn test_merge_is_idempotent() {
    let mut fixture = shapes();
    let merger = DocMerger::default();
    merger.merge(&mut fixture.arena, fixture.introspected, Some(fixture.parsed));
    let once = fixture.arena.clone();

    merger.merge(&mut fixture.arena, fixture.introspected, Some(fixture.parsed));
    assert_eq!(fixture.arena, once);
}

#[test]
fn test_merge_never_crosses_variants() {
    let mut arena = DocArena::new();
    let module = arena.add_value(ValueDoc::module());
    let class = arena.add_value(ValueDoc::class(None).with_docstring("a class"));
    arena.add_member(class, VariableDoc::new("m"));
    let before = arena.clone();

    DocMerger::default().merge(&mut arena, module, Some(class));
    assert_eq!(arena, before);
}

#[test]
fn test_cyclic_bases_terminate() {
    let mut arena = DocArena::new();
    let module = arena.add_value(ValueDoc::module().with_name(name("loop")));
    let a = arena.add_value(ValueDoc::class(Some(Vec::new())));
    let b = arena.add_value(ValueDoc::class(Some(vec![a])));
    if let Some(class) = arena.value_mut(a).as_class_mut() {
        class.bases = Some(vec![b]);
    }
    arena.add_member(a, VariableDoc::new("from_a"));
    arena.add_member(b, VariableDoc::new("from_b"));
    arena.add_member(module, VariableDoc::new("A").with_value(a));
    arena.add_member(module, VariableDoc::new("B").with_value(b));

    DocInheriter::default().inherit(&mut arena, &[module]);

    assert!(arena.member(a, "from_b").is_some());
    assert!(arena.member(b, "from_a").is_some());
}

#[test]
fn test_config_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();

    let config = ApidocConfig::load(file.path()).unwrap();
    assert_eq!(config, ApidocConfig::parse(CONFIG).unwrap());
    assert_eq!(config.namespaces().len(), 1);
    assert_eq!(config.namespaces()[0].groups.len(), 2);
    assert_eq!(config.specs()[0].name.to_string(), "shapes.Circle");
    assert!(config.merge.bases);
}

#[test]
fn test_pretty_print_after_build() {
    let mut fixture = shapes();
    build(&mut fixture);

    let options = PrettyOptions::default().excluding(["id"]);
    let text = fixture.arena.pp(fixture.circle, &options);
    assert!(text.starts_with("ClassDoc"));
    assert!(text.contains("canonical_name = shapes.Circle"));
}
