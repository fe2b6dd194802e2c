use std::env;
use std::fs;

use anyhow::Result;
use testpick::infra::workdir::WorkdirGuard;

// Changing the working directory is process wide, so everything lives in one test.
#[test]
fn guard_enters_first_existing_directory_and_restores() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let src = temp.path().join("src");
    fs::create_dir_all(&src)?;
    let start = env::current_dir()?;

    let missing = temp.path().join("missing").display().to_string();
    let guard = WorkdirGuard::enter_first_existing(&[missing.clone()])?;
    assert!(!guard.is_active());
    assert_eq!(env::current_dir()?, start);
    drop(guard);

    {
        let guard =
            WorkdirGuard::enter_first_existing(&[missing, src.display().to_string()])?;
        assert!(guard.is_active());
        assert_eq!(env::current_dir()?.canonicalize()?, src.canonicalize()?);
    }

    assert_eq!(env::current_dir()?, start);
    Ok(())
}
