use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;

fn apple() -> TypeValue {
    TypeValue::Struct(Rc::new(StructRec::new(
        "main",
        "Apple",
        vec![Member::new("Worm", TypeValue::INT)],
    )))
}

fn frobber() -> TypeValue {
    TypeValue::Interface(Some(Rc::new(InterfaceRec::new("main", "Frobber", vec![]))))
}

#[test]
fn test_c_type_names() {
    let mut typedefs = FuncPtrTypedefs::new();
    let func = typedefs.function(vec![], vec![], false, false);
    let cases = [
        (TypeValue::INT, "P_int"),
        (TypeValue::TYPE, "P__type_"),
        (TypeValue::STRING, "P_string"),
        (TypeValue::slice(TypeValue::BYTE), "Slice"),
        (TypeValue::map(TypeValue::STRING, TypeValue::INT), "Map"),
        (apple(), "Struct"),
        (TypeValue::pointer(apple()), "Pointer"),
        (frobber(), "Interface"),
        (TypeValue::Interface(None), "Interface"),
        (func, "funk_1"),
        (TypeValue::multi(vec![]), "Multi"),
    ];
    for (ty, expected) in cases {
        assert_eq!(ty.c_type(), expected, "for {ty}");
    }
}

#[test]
fn test_struct_equality_is_nominal() {
    let other_apple = TypeValue::Struct(Rc::new(StructRec::new("main", "Apple", vec![])));
    let pear = TypeValue::Struct(Rc::new(StructRec::new("main", "Pear", vec![])));
    let foreign = TypeValue::Struct(Rc::new(StructRec::new("fruit", "Apple", vec![])));

    assert!(apple().equals(&other_apple));
    assert!(!apple().equals(&pear));
    assert!(!apple().equals(&foreign));
}

#[test]
fn test_composites_are_structural() {
    let a = TypeValue::map(TypeValue::STRING, TypeValue::slice(TypeValue::pointer(apple())));
    let b = TypeValue::map(TypeValue::STRING, TypeValue::slice(TypeValue::pointer(apple())));
    let c = TypeValue::map(TypeValue::STRING, TypeValue::slice(TypeValue::INT));
    assert!(a.equals(&b));
    assert!(!a.equals(&c));
    assert!(!TypeValue::CONST_INT.equals(&TypeValue::INT));
}

#[test]
fn test_function_equality_compares_signatures() {
    let mut typedefs = FuncPtrTypedefs::new();
    let f = typedefs.function(
        vec![Member::new("a", TypeValue::INT)],
        vec![Member::new("", TypeValue::STRING)],
        false,
        false,
    );
    let g = typedefs.function(
        vec![Member::new("b", TypeValue::INT)],
        vec![Member::new("r", TypeValue::STRING)],
        false,
        false,
    );
    let h = typedefs.function(vec![Member::new("a", TypeValue::INT)], vec![], false, false);
    assert!(f.equals(&g));
    assert!(!f.equals(&h));
}

#[test]
fn test_assign_rules() {
    let handle = TypeValue::pointer(apple());
    assert_eq!(TypeValue::INT.assign("x", &TypeValue::INT), Some("x".to_owned()));
    assert_eq!(
        frobber().assign("p", &handle),
        Some("HandleToInterface(p)".to_owned())
    );
    assert_eq!(
        TypeValue::Interface(None).assign("f", &frobber()),
        Some("f".to_owned())
    );
    assert_eq!(
        TypeValue::BYTE.assign("65", &TypeValue::CONST_INT),
        Some("(P_byte)(65)".to_owned())
    );
    assert_eq!(
        handle.assign("(void*)0", &TypeValue::NIL),
        Some("(void*)0".to_owned())
    );
    assert_eq!(TypeValue::INT.assign("s", &TypeValue::STRING), None);
    assert_eq!(TypeValue::INT.assign("b", &TypeValue::BYTE), None);
    assert_eq!(frobber().assign("a", &apple()), None);
}

#[test]
fn test_named_interfaces_do_not_convert() {
    let closer = TypeValue::Interface(Some(Rc::new(InterfaceRec::new(
        "main",
        "Closer",
        vec![Member::new("Close", TypeValue::INT)],
    ))));
    assert_eq!(frobber().assign("c", &closer), None);
    assert_eq!(closer.assign("f", &frobber()), None);
    assert_eq!(frobber().cast("c", &closer), None);
    assert_eq!(closer.assign("c", &closer.clone()), Some("c".to_owned()));
    assert_eq!(
        TypeValue::Interface(None).cast("c", &closer),
        Some("c".to_owned())
    );
    assert_eq!(frobber().assign("a", &TypeValue::Interface(None)), None);
}

#[test]
fn test_cast_between_int_like() {
    assert_eq!(
        TypeValue::BYTE.cast("n", &TypeValue::INT),
        Some("(P_byte)(n)".to_owned())
    );
    assert_eq!(
        TypeValue::Prim(Prim::Uintptr).cast("b", &TypeValue::BYTE),
        Some("(P_uintptr)(b)".to_owned())
    );
    assert_eq!(TypeValue::STRING.cast("n", &TypeValue::INT), None);
    assert_eq!(TypeValue::BOOL.cast("n", &TypeValue::INT), None);
}

#[test]
#[should_panic(expected = "cannot assign to type `_type_`")]
fn test_assign_to_metatype_panics() {
    let _ = TypeValue::TYPE.assign("x", &TypeValue::INT);
}

#[test]
#[should_panic(expected = "multi-valued types cannot be compared")]
fn test_multi_equality_panics() {
    let multi = TypeValue::multi(vec![Member::new("", TypeValue::INT)]);
    let _ = multi.equals(&TypeValue::INT);
}

#[test]
fn test_signature_str() {
    let mut typedefs = FuncPtrTypedefs::new();
    let single = typedefs.function(
        vec![Member::new("a", TypeValue::INT), Member::new("_", TypeValue::STRING)],
        vec![Member::new("", TypeValue::BOOL)],
        false,
        false,
    );
    let multi = typedefs.function(
        vec![Member::new("x", TypeValue::INT)],
        vec![
            Member::new("q", TypeValue::INT),
            Member::new("", TypeValue::STRING),
        ],
        false,
        false,
    );
    let none = typedefs.function(vec![], vec![], false, false);

    let Some(single) = single.as_function() else {
        panic!("expected a function type")
    };
    let Some(multi) = multi.as_function() else {
        panic!("expected a function type")
    };
    let Some(none) = none.as_function() else {
        panic!("expected a function type")
    };

    assert_eq!(
        single.signature_str("main__f"),
        "P_bool main__f(P_int in_a, P_string __1)"
    );
    assert_eq!(
        multi.signature_str("main__g"),
        "void main__g(P_int in_x, P_int *out_q, P_string *out__1)"
    );
    assert_eq!(none.signature_str("main__h"), "void main__h()");
    assert_eq!(none.typedef_line(), "typedef void (*funk_3)();");
}

#[test]
fn test_typedef_requested_once() {
    let mut typedefs = FuncPtrTypedefs::new();
    let f = typedefs.function(vec![], vec![Member::new("", TypeValue::INT)], false, false);
    assert_eq!(
        typedefs.request(&f),
        Some("typedef P_int (*funk_1)();".to_owned())
    );
    assert_eq!(typedefs.request(&f), None);
    assert_eq!(typedefs.request(&TypeValue::INT), None);

    let g = typedefs.function(vec![], vec![], false, false);
    assert_eq!(g.c_type(), "funk_2");
}

#[test]
fn test_forward_resolution() {
    let handle = ForwardRef::new("Apple");
    let forward = TypeValue::Forward(handle.clone());
    assert_eq!(
        forward.resolve().map(|_| ()),
        Err(ResolveError::Unbound("Apple".to_owned()))
    );

    handle.bind(apple());
    assert!(handle.is_bound());
    assert!(forward.equals(&apple()));
    assert_eq!(TypeValue::pointer(forward).c_type(), "Pointer");
}

#[test]
fn test_forward_cycles_are_errors() {
    let a = ForwardRef::new("A");
    let b = ForwardRef::new("B");
    a.bind(TypeValue::Forward(b.clone()));
    b.bind(TypeValue::Forward(a.clone()));
    assert_eq!(
        TypeValue::Forward(a).resolve().map(|_| ()),
        Err(ResolveError::TooDeep("A".to_owned()))
    );

    let s = ForwardRef::new("S");
    s.bind(TypeValue::slice(TypeValue::Forward(s.clone())));
    assert!(matches!(
        TypeValue::Forward(s).validate(),
        Err(ResolveError::TooDeep(_))
    ));
}

#[test]
fn test_zero_values() {
    assert_eq!(TypeValue::INT.zero_value(), "0");
    assert_eq!(TypeValue::BOOL.zero_value(), "0");
    assert_eq!(TypeValue::STRING.zero_value(), "{0, 0, 0}");
    assert_eq!(TypeValue::slice(TypeValue::INT).zero_value(), "{0, 0, 0}");
    assert_eq!(TypeValue::pointer(apple()).zero_value(), "(void*)0");
    assert_eq!(frobber().zero_value(), "(void*)0");
    assert!(!apple().has_zero_value());
    assert!(apple().is_storable());
    assert!(!TypeValue::TYPE.is_storable());
}

#[test]
fn test_lookups() {
    assert!(TypeValue::STRING.element().is_some_and(|t| t.equals(&TypeValue::BYTE)));
    assert!(TypeValue::INT.element().is_none());
    let bytes = TypeValue::slice(TypeValue::BYTE);
    assert!(bytes.slice_element().is_some_and(|t| t.equals(&TypeValue::BYTE)));
    assert!(TypeValue::STRING.slice_element().is_none());
    assert!(TypeValue::map(TypeValue::INT, TypeValue::INT).slice_element().is_none());

    let handle = TypeValue::pointer(apple());
    let Some(rec) = handle.pointee_struct() else {
        panic!("expected a struct pointer")
    };
    assert_eq!(rec.c_name(), "main__Apple");
    assert!(rec.field("Worm").is_some());
    assert!(apple().pointee_struct().is_none());

    assert_eq!(handle.to_string(), "*main.Apple");
    assert_eq!(
        TypeValue::map(TypeValue::STRING, TypeValue::Interface(None)).to_string(),
        "map[string]interface{}"
    );
}

// === Property tests ===

mod properties {
    use std::rc::Rc;

    use proptest::prelude::*;

    use crate::{InterfaceRec, Prim, StructRec, TypeValue};

    fn leaf() -> impl Strategy<Value = TypeValue> {
        prop_oneof![
            proptest::sample::select(Prim::ALL.to_vec()).prop_map(TypeValue::Prim),
            prop_oneof![Just("A"), Just("B")].prop_map(|name| {
                TypeValue::Struct(Rc::new(StructRec::new("main", name, vec![])))
            }),
            Just(TypeValue::Interface(None)),
            interface(),
        ]
    }

    /// Two distinct named interfaces.
    fn interface() -> impl Strategy<Value = TypeValue> {
        prop_oneof![Just("I"), Just("J")].prop_map(|name| {
            TypeValue::Interface(Some(Rc::new(InterfaceRec::new("main", name, vec![]))))
        })
    }

    fn any_interface() -> impl Strategy<Value = TypeValue> {
        prop_oneof![Just(TypeValue::Interface(None)), interface()]
    }

    fn type_value() -> impl Strategy<Value = TypeValue> {
        leaf().prop_recursive(4, 32, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(TypeValue::pointer),
                inner.clone().prop_map(TypeValue::slice),
                (inner.clone(), inner).prop_map(|(k, v)| TypeValue::map(k, v)),
            ]
        })
    }

    fn castable_prim() -> impl Strategy<Value = Prim> {
        proptest::sample::select(vec![
            Prim::Bool,
            Prim::Byte,
            Prim::ConstInt,
            Prim::Int,
            Prim::Uint,
            Prim::Uintptr,
            Prim::String,
            Prim::Any,
            Prim::Nil,
        ])
    }

    proptest! {
        #[test]
        fn equality_is_symmetric_and_structural(a in type_value(), b in type_value()) {
            let same_shape = a.to_string() == b.to_string();
            prop_assert_eq!(a.equals(&b), same_shape);
            prop_assert_eq!(b.equals(&a), same_shape);
        }

        #[test]
        fn equality_is_reflexive(a in type_value()) {
            prop_assert!(a.equals(&a.clone()));
        }

        #[test]
        fn interface_conversion_needs_same_name_or_universal_dest(
            dest in any_interface(),
            src in any_interface(),
        ) {
            let allowed = dest.equals(&src) || dest.to_string() == "interface{}";
            prop_assert_eq!(dest.assign("v", &src).is_some(), allowed);
            prop_assert_eq!(dest.cast("v", &src).is_some(), allowed);
        }

        #[test]
        fn cast_between_prims(dest in castable_prim(), src in castable_prim()) {
            let cast = TypeValue::Prim(dest).cast("v", &TypeValue::Prim(src));
            if dest == src {
                prop_assert_eq!(cast, Some("v".to_owned()));
            } else if dest.is_int_like() && src.is_int_like() {
                prop_assert_eq!(cast, Some(format!("({})(v)", dest.c_type())));
            } else {
                prop_assert_eq!(cast, None);
            }
        }
    }
}
