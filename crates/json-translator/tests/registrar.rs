use std::sync::Arc;
use std::thread;

use component_container::{ComponentRegistrar, Container, ContainerError};
use json_translator::{
    JsonComponentRegistrar, JsonFlags, JsonTranslator, Record, Translator, TranslatorConfig,
};

fn same_instance<A: ?Sized, B: ?Sized>(a: &Arc<A>, b: &Arc<B>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

#[test]
fn test_unregistered_container_has_no_translator() {
    let container = Container::new();
    assert!(!container.has::<dyn Translator>());
    assert!(matches!(
        container.get::<dyn Translator>(),
        Err(ContainerError::NotBound { .. })
    ));
}

#[test]
fn test_register_binds_contract_and_implementation() {
    let mut container = Container::new();
    JsonComponentRegistrar.register(&mut container);

    assert!(container.has::<dyn Translator>());
    assert!(container.has::<JsonTranslator>());

    let translator = container.get::<dyn Translator>().unwrap();
    assert_eq!(translator.decode_to_mapping("[1]").unwrap().len(), 1);
}

#[test]
fn test_register_twice_is_idempotent() {
    let mut container = Container::new();
    container
        .install(&JsonComponentRegistrar)
        .install(&JsonComponentRegistrar);

    assert_eq!(container.len(), 2);

    let by_contract = container.get::<dyn Translator>().unwrap();
    let by_type = container.get::<JsonTranslator>().unwrap();
    assert!(same_instance(&by_contract, &by_type));
    assert!(same_instance(&by_type, &container.get::<JsonTranslator>().unwrap()));
}

#[test]
fn test_bound_config_reaches_translator() {
    let config = TranslatorConfig::new()
        .with_max_depth(3)
        .with_flags(JsonFlags::default() | JsonFlags::PRETTY_PRINT);

    let mut container = Container::new();
    container
        .install(&JsonComponentRegistrar)
        .bind_instance(config);

    let translator = container.get::<JsonTranslator>().unwrap();
    assert_eq!(translator.max_depth(), 3);
    assert!(translator.flags().contains(JsonFlags::PRETTY_PRINT | JsonFlags::THROW_ON_ERROR));
    assert!(translator.decode_to_mapping("[[[[]]]]").is_err());
}

#[test]
fn test_resolution_across_threads() {
    let mut container = Container::new();
    container.install(&JsonComponentRegistrar);
    let container = Arc::new(container);

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let container = Arc::clone(&container);
            thread::spawn(move || {
                let translator = container.get::<dyn Translator>().unwrap();
                let record: Record = [("n", n)].into_iter().collect();
                translator.encode_record(&record).unwrap()
            })
        })
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!(r#"{{"n":{n}}}"#));
    }
}
