use anyhow::Result;
use wallet_registry::{
    codes, identity, BackendError, BackendKind, BackendRegistry, Error,
    UnitStatus,
};
use wallet_test_utils::mock::{MockFactory, Outcomes};

#[tokio::test]
async fn teardown_notifies_pending() -> Result<()> {
    let factory = MockFactory::new();
    let registry = BackendRegistry::new(factory.clone())?;
    let mut outcomes = Outcomes::new();

    let handle = registry
        .acquire(BackendKind::LocalKeys, "a", outcomes.callback(1))
        .unwrap();
    let _other = registry
        .acquire(BackendKind::LocalKeys, "a", outcomes.callback(2))
        .unwrap();

    registry.teardown();
    assert!(registry.is_closed());
    assert!(registry.is_empty());

    let received = outcomes.collect(2).await?;
    assert_eq!(vec![1, 2], received.iter().map(|(t, _)| *t).collect::<Vec<_>>());
    for (_, outcome) in received {
        assert_eq!(codes::REGISTRY_SHUTDOWN, outcome.unwrap_err().code());
    }

    // Completing the detached initialization notifies no one
    factory.release("a", Ok(()));
    assert!(outcomes.is_quiet().await);

    assert!(registry
        .acquire(BackendKind::LocalKeys, "a", outcomes.callback(3))
        .is_none());
    assert!(outcomes.is_quiet().await);
    assert!(matches!(
        registry
            .acquire_initialized(BackendKind::LocalKeys, "a")
            .await,
        Err(Error::Closed)
    ));

    // Existing handles remain usable
    handle.create_new_key().await?;
    assert_eq!(1, handle.keys().len());
    Ok(())
}

#[test]
fn runtime_shutdown_fails_initialization() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let factory = MockFactory::new();
    let registry = BackendRegistry::with_runtime(
        factory.clone(),
        runtime.handle().clone(),
    );
    let mut outcomes = Outcomes::new();

    let pending = registry
        .acquire(BackendKind::LocalKeys, "a", outcomes.callback(1))
        .unwrap();
    assert!(outcomes.try_next().is_none());

    drop(runtime);
    assert_eq!(Some((1, Err(BackendError::shutdown()))), outcomes.try_next());
    let hash = identity(BackendKind::LocalKeys, "a");
    assert_eq!(
        Some(UnitStatus::Failed(BackendError::shutdown())),
        registry.status(&hash)
    );

    // Initialization can no longer be scheduled
    let rejected = registry
        .acquire(BackendKind::LocalKeys, "b", outcomes.callback(2))
        .unwrap();
    assert_eq!(Some((2, Err(BackendError::shutdown()))), outcomes.try_next());

    let late = registry
        .acquire(BackendKind::LocalKeys, "a", outcomes.callback(3))
        .unwrap();
    assert_eq!(Some((3, Err(BackendError::shutdown()))), outcomes.try_next());
    assert!(late.ptr_eq(&pending));
    assert_eq!(0, factory.initialize_calls());
    drop(rejected);
    Ok(())
}
