use abc_mini_netlist::{
    Design, EXDC_NAME, HierarchyError, Instance, Network, NetworkFunc, NetworkType, ObjectData, ObjectKind,
    check_acyclic_hierarchy, extract_exdc, find_top_level_modules,
};

fn network(name: &str, children: &[&str]) -> Network {
    let mut network = Network::new(name, NetworkType::Netlist, NetworkFunc::Sop);
    for &child in children {
        network.add_object(
            ObjectKind::BlackBox,
            None,
            ObjectData::Instance(Instance { model: child.into(), inputs: vec![], outputs: vec![] }),
        );
    }
    network
}

fn design(modules: &[(&str, &[&str])]) -> Design {
    let mut design = Design::new("test");
    for &(name, children) in modules {
        design.add_module(network(name, children));
    }
    design
}

fn names(design: &Design) -> Vec<&str> {
    design.modules().iter().map(Network::name).collect()
}

#[test]
fn test_exdc_sibling() {
    let mut design = design(&[("M", &[]), (EXDC_NAME, &[]), ("N", &[])]);
    assert_eq!(extract_exdc(&mut design), Some(0));
    assert_eq!(names(&design), vec!["M", "N"]);
    let m = design.module(0).unwrap();
    let exdc = m.exdc().unwrap();
    assert_eq!(exdc.name(), EXDC_NAME);
    assert_eq!(exdc.design(), None);
    assert_eq!(find_top_level_modules(&mut design), 2);
}

#[test]
fn test_exdc_attaches_to_preceding_module() {
    let mut design = design(&[("M", &[]), ("N", &[]), (EXDC_NAME, &[])]);
    assert_eq!(extract_exdc(&mut design), Some(1));
    assert!(design.module(0).unwrap().exdc().is_none());
    assert!(design.module(1).unwrap().exdc().is_some());
}

#[test]
fn test_second_exdc_stays() {
    let mut design = design(&[("M", &[]), (EXDC_NAME, &[]), ("N", &[]), (EXDC_NAME, &[])]);
    assert_eq!(extract_exdc(&mut design), Some(0));
    assert_eq!(names(&design), vec!["M", "N", EXDC_NAME]);
    assert!(design.module(1).unwrap().exdc().is_none());
}

#[test]
fn test_exdc_first_module_ignored() {
    let mut design = design(&[(EXDC_NAME, &[]), ("M", &[])]);
    assert_eq!(extract_exdc(&mut design), None);
    assert_eq!(names(&design), vec![EXDC_NAME, "M"]);
}

#[test]
fn test_top_level_modules() {
    let mut design = design(&[("leaf", &[]), ("top", &["mid", "leaf"]), ("mid", &["leaf"]), ("other", &[])]);
    assert_eq!(find_top_level_modules(&mut design), 2);
    assert_eq!(design.top_level_modules().as_slice(), &[1, 3]);
}

#[test]
fn test_self_instance_stays_top_level() {
    let mut design = design(&[("a", &["a"])]);
    assert_eq!(find_top_level_modules(&mut design), 1);
    assert_eq!(
        check_acyclic_hierarchy(&design, 0),
        Err(HierarchyError::Cycle { root: "a".into(), module: "a".into() })
    );
}

#[test]
fn test_acyclic() {
    let design = design(&[("top", &["mid", "leaf"]), ("mid", &["leaf"]), ("leaf", &[])]);
    assert_eq!(check_acyclic_hierarchy(&design, 0), Ok(()));
}

#[test]
fn test_cycle_below_root() {
    let design = design(&[("top", &["a"]), ("a", &["b"]), ("b", &["a"])]);
    let err = check_acyclic_hierarchy(&design, 0).unwrap_err();
    assert_eq!(err, HierarchyError::Cycle { root: "top".into(), module: "a".into() });
    assert_eq!(
        err.to_string(),
        "the hierarchy of network \"top\" is cyclic: model \"a\" is part of an instantiation cycle"
    );
}

#[test]
#[should_panic]
fn test_root_out_of_range() {
    let design = design(&[("top", &[])]);
    let _ = check_acyclic_hierarchy(&design, 1);
}

#[test]
fn test_unreachable_cycle_ignored() {
    let design = design(&[("top", &["leaf"]), ("leaf", &[]), ("a", &["b"]), ("b", &["a"])]);
    assert_eq!(check_acyclic_hierarchy(&design, 0), Ok(()));
}
