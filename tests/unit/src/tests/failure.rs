use anyhow::Result;
use pretty_assertions::assert_eq;
use wallet_registry::{
    codes, identity, BackendError, BackendKind, BackendRegistry, Error,
    UnitStatus,
};
use wallet_test_utils::mock::{MockFactory, Outcomes};

fn bad_password() -> BackendError {
    BackendError::new(42, "bad password")
}

#[tokio::test]
async fn failure_is_cached() -> Result<()> {
    let factory = MockFactory::new();
    let registry = BackendRegistry::new(factory.clone())?;
    let mut outcomes = Outcomes::new();
    let hash = identity(BackendKind::LocalKeys, "a");

    let _handle = registry
        .acquire(BackendKind::LocalKeys, "a", outcomes.callback(1))
        .unwrap();
    factory.release("a", Err(bad_password()));
    assert_eq!((1, Err(bad_password())), outcomes.next().await?);
    assert_eq!(
        Some(UnitStatus::Failed(bad_password())),
        registry.status(&hash)
    );

    let _retry = registry
        .acquire(BackendKind::LocalKeys, "a", outcomes.callback(2))
        .unwrap();
    assert_eq!(Some((2, Err(bad_password()))), outcomes.try_next());

    let result = registry
        .acquire_initialized(BackendKind::LocalKeys, "a")
        .await;
    match result {
        Err(Error::Initialize(err)) => {
            assert_eq!(42, err.code());
            assert_eq!("bad password", err.message());
        }
        other => panic!("unexpected result {:?}", other),
    }

    assert_eq!(1, factory.constructed());
    assert_eq!(1, factory.initialize_calls());
    Ok(())
}

#[tokio::test]
async fn failure_invalidate_retries() -> Result<()> {
    let factory = MockFactory::new();
    let registry = BackendRegistry::new(factory.clone())?;
    let mut outcomes = Outcomes::new();
    let hash = identity(BackendKind::LocalKeys, "a");

    let failed = registry
        .acquire(BackendKind::LocalKeys, "a", outcomes.callback(1))
        .unwrap();
    factory.release("a", Err(bad_password()));
    assert_eq!((1, Err(bad_password())), outcomes.next().await?);

    assert!(registry.invalidate(&hash));
    assert!(registry.status(&hash).is_none());
    assert!(!registry.invalidate(&hash));

    factory.release("a", Ok(()));
    let retried = registry
        .acquire(BackendKind::LocalKeys, "a", outcomes.callback(2))
        .unwrap();
    assert!(!retried.ptr_eq(&failed));
    assert_eq!((2, Ok(())), outcomes.next().await?);
    assert_eq!(2, factory.constructed());
    assert_eq!(2, factory.initialize_calls());

    // Releasing the invalidated backend leaves the new unit alone
    drop(failed);
    assert_eq!(Some(UnitStatus::Initialized), registry.status(&hash));
    assert!(!registry.invalidate(&hash));
    Ok(())
}

#[tokio::test]
async fn failure_on_panic() -> Result<()> {
    let factory = MockFactory::new();
    let registry = BackendRegistry::new(factory.clone())?;
    let mut outcomes = Outcomes::new();

    factory.panic_on("broken");
    let _handle = registry
        .acquire(BackendKind::LocalKeys, "broken", outcomes.callback(1))
        .unwrap();
    let (tag, outcome) = outcomes.next().await?;
    assert_eq!(1, tag);
    assert_eq!(codes::BACKEND_PANICKED, outcome.unwrap_err().code());

    let hash = identity(BackendKind::LocalKeys, "broken");
    assert!(matches!(
        registry.status(&hash),
        Some(UnitStatus::Failed(_))
    ));
    Ok(())
}
