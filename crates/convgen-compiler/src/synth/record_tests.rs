use convgen_core::{Function, Member, TypeId, Universe};

use crate::options::Options;
use crate::synth::{SuppressReason, WrapperState};
use crate::test_utils::{CORE, V1, body, convert, peered_universe, record_pair};

fn manual(universe: &mut Universe, name: &str, source: TypeId, target: TypeId) -> Function {
    let (from, to) = (universe.pointer(source), universe.pointer(target));
    let error = universe.builtin("error");
    Function::new(V1, name).param("in", from).param("out", to).result(error)
}

fn safe() -> Options {
    Options::new().no_unsafe_conversions(true)
}

#[test]
fn identical_records_copy_member_by_member() {
    let mut universe = peered_universe();
    let (string, int32) = (universe.builtin("string"), universe.builtin("int32"));
    let (v1, core) = record_pair(
        &mut universe,
        "Pod",
        vec![Member::new("Name", string), Member::new("Replicas", int32)],
    );

    let conversion = convert(&universe, &Options::new(), v1, core);

    assert!(conversion.function.field_errors.is_empty());
    assert!(conversion.function.warnings.is_empty());
    assert_eq!(conversion.state, WrapperState::PublicEligible);
    insta::assert_snapshot!(body(&universe, &Options::new(), v1, core), @r"
    out.Name = in.Name
    out.Replicas = in.Replicas
    ");
}

#[test]
fn differing_builtins_and_aliases_are_converted() {
    let mut universe = peered_universe();
    let (string, int32, int64) = (
        universe.builtin("string"),
        universe.builtin("int32"),
        universe.builtin("int64"),
    );
    let v1_phase = universe.add_alias(V1, "Phase", string);
    let core_phase = universe.add_alias(CORE, "Phase", string);
    let v1 = universe.add_record(
        V1,
        "Pod",
        vec![Member::new("Size", int32), Member::new("Phase", v1_phase)],
    );
    let core = universe.add_record(
        CORE,
        "Pod",
        vec![Member::new("Size", int64), Member::new("Phase", core_phase)],
    );

    insta::assert_snapshot!(body(&universe, &Options::new(), v1, core), @r"
    out.Size = int64(in.Size)
    out.Phase = core.Phase(in.Phase)
    ");
}

#[test]
fn composite_members_recurse_behind_nil_guards() {
    let mut universe = peered_universe();
    let string = universe.builtin("string");
    let (v1_container, core_container) =
        record_pair(&mut universe, "Container", vec![Member::new("Image", string)]);
    let tags = universe.sequence(string);
    let labels = universe.associative(string, string);
    let v1_containers = universe.sequence(v1_container);
    let core_containers = universe.sequence(core_container);
    let v1_main = universe.pointer(v1_container);
    let core_main = universe.pointer(core_container);
    let v1 = universe.add_record(
        V1,
        "PodSpec",
        vec![
            Member::new("Tags", tags),
            Member::new("Labels", labels),
            Member::new("Containers", v1_containers),
            Member::new("Main", v1_main),
        ],
    );
    let core = universe.add_record(
        CORE,
        "PodSpec",
        vec![
            Member::new("Tags", tags),
            Member::new("Labels", labels),
            Member::new("Containers", core_containers),
            Member::new("Main", core_main),
        ],
    );

    insta::assert_snapshot!(body(&universe, &safe(), v1, core), @r"
    if in.Tags != nil {
        in, out := &in.Tags, &out.Tags
        *out = make([]string, len(*in))
        copy(*out, *in)
    } else {
        out.Tags = nil
    }
    if in.Labels != nil {
        in, out := &in.Labels, &out.Labels
        *out = make(map[string]string, len(*in))
        for key, val := range *in {
            (*out)[key] = val
        }
    } else {
        out.Labels = nil
    }
    if in.Containers != nil {
        in, out := &in.Containers, &out.Containers
        *out = make([]core.Container, len(*in))
        for i := range *in {
            if err := Convert_v1_Container_To_core_Container(&(*in)[i], &(*out)[i]); err != nil {
                return err
            }
        }
    } else {
        out.Containers = nil
    }
    if in.Main != nil {
        in, out := &in.Main, &out.Main
        *out = new(core.Container)
        if err := Convert_v1_Container_To_core_Container(*in, *out); err != nil {
            return err
        }
    } else {
        out.Main = nil
    }
    ");
}

#[test]
fn layout_equivalent_members_are_reinterpreted() {
    let mut universe = peered_universe();
    let string = universe.builtin("string");
    let (v1_container, core_container) =
        record_pair(&mut universe, "Container", vec![Member::new("Image", string)]);
    let v1_containers = universe.sequence(v1_container);
    let core_containers = universe.sequence(core_container);
    let v1_main = universe.pointer(v1_container);
    let core_main = universe.pointer(core_container);
    let v1 = universe.add_record(
        V1,
        "PodSpec",
        vec![
            Member::new("Containers", v1_containers),
            Member::new("Main", v1_main),
            Member::new("Sidecar", v1_container),
        ],
    );
    let core = universe.add_record(
        CORE,
        "PodSpec",
        vec![
            Member::new("Containers", core_containers),
            Member::new("Main", core_main),
            Member::new("Sidecar", core_container),
        ],
    );

    insta::assert_snapshot!(body(&universe, &Options::new(), v1, core), @r"
    out.Containers = *(*[]core.Container)(unsafe.Pointer(&in.Containers))
    out.Main = (*core.Container)(unsafe.Pointer(in.Main))
    out.Sidecar = *(*core.Container)(unsafe.Pointer(&in.Sidecar))
    ");
}

#[test]
fn assignable_record_in_same_namespace_is_assigned() {
    let mut universe = peered_universe();
    let string = universe.builtin("string");
    let meta = universe.add_record(V1, "Meta", vec![Member::new("Name", string)]);
    let v1 = universe.add_record(V1, "Pod", vec![Member::new("Meta", meta)]);
    let other = universe.add_record(V1, "Template", vec![Member::new("Meta", meta)]);

    insta::assert_snapshot!(body(&universe, &Options::new(), v1, other), @"out.Meta = in.Meta");
    insta::assert_snapshot!(body(&universe, &safe(), v1, other), @"out.Meta = in.Meta");
}

#[test]
fn shared_record_used_twice_is_assigned() {
    let mut universe = peered_universe();
    let int64 = universe.builtin("int64");
    let time = universe.add_record("example.com/shared", "Time", vec![Member::new("Sec", int64)]);
    let meta = universe.add_record(
        "example.com/shared",
        "Meta",
        vec![Member::new("Created", time), Member::new("Updated", time)],
    );
    let (v1, core) = record_pair(&mut universe, "Pod", vec![Member::new("Meta", meta)]);

    let conversion = convert(&universe, &safe(), v1, core);

    assert!(conversion.function.warnings.is_empty());
    insta::assert_snapshot!(body(&universe, &safe(), v1, core), @"out.Meta = in.Meta");
    insta::assert_snapshot!(body(&universe, &Options::new(), v1, core), @"out.Meta = in.Meta");
}

#[test]
fn nested_records_call_generated_conversion() {
    let mut universe = peered_universe();
    let string = universe.builtin("string");
    let tags = universe.sequence(string);
    let (v1_spec, core_spec) = record_pair(&mut universe, "PodSpec", vec![Member::new("Tags", tags)]);
    let v1 = universe.add_record(V1, "Pod", vec![Member::new("Spec", v1_spec)]);
    let core = universe.add_record(CORE, "Pod", vec![Member::new("Spec", core_spec)]);

    insta::assert_snapshot!(body(&universe, &safe(), v1, core), @r"
    if err := Convert_v1_PodSpec_To_core_PodSpec(&in.Spec, &out.Spec); err != nil {
        return err
    }
    ");
    insta::assert_snapshot!(body(&universe, &safe(), core, v1), @r"
    if err := Convert_core_PodSpec_To_v1_PodSpec(&in.Spec, &out.Spec); err != nil {
        return err
    }
    ");
}

#[test]
fn opted_out_member_leaves_marker() {
    let mut universe = peered_universe();
    let string = universe.builtin("string");
    let (v1, core) = record_pair(
        &mut universe,
        "Secret",
        vec![
            Member::new("Name", string),
            Member::new("Data", string).with_comment("+conversion-gen=false"),
        ],
    );

    let conversion = convert(&universe, &Options::new(), v1, core);

    assert!(conversion.function.field_errors.is_empty());
    insta::assert_snapshot!(body(&universe, &Options::new(), v1, core), @r"
    out.Name = in.Name
    // INFO: in.Data opted out of conversion generation
    ");
}

#[test]
fn missing_member_without_handler_warns() {
    let mut universe = peered_universe();
    let string = universe.builtin("string");
    let v1 = universe.add_record(
        V1,
        "Pod",
        vec![Member::new("Name", string), Member::new("Extra", string)],
    );
    let core = universe.add_record(CORE, "Pod", vec![Member::new("Name", string)]);

    let conversion = convert(&universe, &Options::new(), v1, core);

    assert!(conversion.function.field_errors.is_empty());
    assert_eq!(conversion.function.warnings.len(), 1);
    assert_eq!(
        conversion.function.warnings[0].to_string(),
        "example.com/api/v1.Pod.Extra: requires manual conversion: does not exist in peer-type example.com/internal/core.Pod"
    );
    assert_eq!(conversion.state, WrapperState::PublicEligible);
    insta::assert_snapshot!(body(&universe, &Options::new(), v1, core), @"out.Name = in.Name");
}

#[test]
fn missing_member_with_strict_handler_suppresses_public() {
    let mut universe = peered_universe();
    let string = universe.builtin("string");
    let v1 = universe.add_record(
        V1,
        "Pod",
        vec![Member::new("Name", string), Member::new("Extra", string)],
    );
    let core = universe.add_record(CORE, "Pod", vec![Member::new("Name", string)]);
    let options = Options::new().no_public_conversion_on_error();

    let conversion = convert(&universe, &options, v1, core);

    assert_eq!(conversion.function.field_errors.len(), 1);
    assert_eq!(
        conversion.function.field_errors[0].message,
        "field Extra requires manual conversion"
    );
    assert_eq!(
        conversion.state,
        WrapperState::PublicSuppressed(SuppressReason::FieldErrors(1))
    );
    insta::assert_snapshot!(body(&universe, &options, v1, core), @r"
    out.Name = in.Name
    // WARNING: in.Extra requires manual conversion: does not exist in peer-type
    ");
}

#[test]
fn inconvertible_members_go_to_handler() {
    let mut universe = peered_universe();
    let int32 = universe.builtin("int32");
    let counts = universe.sequence(int32);
    let v1 = universe.add_record(V1, "Pod", vec![Member::new("Count", int32)]);
    let core = universe.add_record(CORE, "Pod", vec![Member::new("Count", counts)]);

    let lenient = convert(&universe, &Options::new(), v1, core);
    assert!(lenient.function.field_errors.is_empty());
    assert_eq!(lenient.function.warnings.len(), 1);
    assert!(lenient.function.body.is_empty());

    let options = Options::new().no_public_conversion_on_error();
    let strict = convert(&universe, &options, v1, core);
    assert_eq!(strict.function.field_errors.len(), 1);
    insta::assert_snapshot!(body(&universe, &options, v1, core), @"// WARNING: in.Count requires manual conversion: inconvertible types (int32 vs []int32)");
}

#[test]
fn unknown_members_need_external_conversion() {
    let mut universe = peered_universe();
    let v1_handler = universe.declare(V1, "Handler");
    let core_handler = universe.declare(CORE, "Handler");
    let v1 = universe.add_record(V1, "Probe", vec![Member::new("Handler", v1_handler)]);
    let core = universe.add_record(CORE, "Probe", vec![Member::new("Handler", core_handler)]);

    let lenient = convert(&universe, &Options::new(), v1, core);
    assert!(lenient.function.field_errors.is_empty());
    assert_eq!(
        lenient.function.warnings[0].message,
        "values of type example.com/api/v1.Handler require manual conversion to external type example.com/internal/core.Handler"
    );

    let options = Options::new().no_public_conversion_on_error();
    let strict = convert(&universe, &options, v1, core);
    assert_eq!(
        strict.state,
        WrapperState::PublicSuppressed(SuppressReason::FieldErrors(1))
    );
    insta::assert_snapshot!(body(&universe, &options, v1, core), @"// WARNING: requires manual conversion: no conversion function for example.com/api/v1.Handler to example.com/internal/core.Handler");
}

#[test]
fn manual_conversion_is_called_instead_of_member_logic() {
    let mut universe = peered_universe();
    let string = universe.builtin("string");
    let tags = universe.sequence(string);
    let (v1_quantity, core_quantity) =
        record_pair(&mut universe, "Quantity", vec![Member::new("Tags", tags)]);
    let v1 = universe.add_record(V1, "Limits", vec![Member::new("Size", v1_quantity)]);
    let core = universe.add_record(CORE, "Limits", vec![Member::new("Size", core_quantity)]);
    let function = manual(
        &mut universe,
        "Convert_v1_Quantity_To_core_Quantity",
        v1_quantity,
        core_quantity,
    );
    universe.add_function(function);

    insta::assert_snapshot!(body(&universe, &Options::new(), v1, core), @r"
    if err := Convert_v1_Quantity_To_core_Quantity(&in.Size, &out.Size); err != nil {
        return err
    }
    ");
}

#[test]
fn dropped_manual_conversion_skips_member() {
    let mut universe = peered_universe();
    let string = universe.builtin("string");
    let (v1_quantity, core_quantity) =
        record_pair(&mut universe, "Quantity", vec![Member::new("Value", string)]);
    let v1 = universe.add_record(
        V1,
        "Limits",
        vec![Member::new("Name", string), Member::new("Size", v1_quantity)],
    );
    let core = universe.add_record(
        CORE,
        "Limits",
        vec![Member::new("Name", string), Member::new("Size", core_quantity)],
    );
    let function = manual(&mut universe, "dropQuantity", v1_quantity, core_quantity)
        .with_comment("+conversion-gen=drop");
    universe.add_function(function);

    let conversion = convert(&universe, &Options::new().no_public_conversion_on_error(), v1, core);

    assert!(conversion.function.field_errors.is_empty());
    assert!(conversion.function.warnings.is_empty());
    insta::assert_snapshot!(body(&universe, &Options::new(), v1, core), @"out.Name = in.Name");
}

#[test]
fn copy_only_manual_conversion_yields_to_fast_path() {
    let mut universe = peered_universe();
    let string = universe.builtin("string");
    let (v1_quantity, core_quantity) =
        record_pair(&mut universe, "Quantity", vec![Member::new("Value", string)]);
    let v1 = universe.add_record(V1, "Limits", vec![Member::new("Size", v1_quantity)]);
    let core = universe.add_record(CORE, "Limits", vec![Member::new("Size", core_quantity)]);
    let function = manual(
        &mut universe,
        "Convert_v1_Quantity_To_core_Quantity",
        v1_quantity,
        core_quantity,
    )
    .with_comment("+conversion-gen=copy-only");
    universe.add_function(function);

    insta::assert_snapshot!(body(&universe, &Options::new(), v1, core), @"out.Size = *(*core.Quantity)(unsafe.Pointer(&in.Size))");
    insta::assert_snapshot!(body(&universe, &safe(), v1, core), @r"
    if err := Convert_v1_Quantity_To_core_Quantity(&in.Size, &out.Size); err != nil {
        return err
    }
    ");
}
