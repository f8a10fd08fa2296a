use crate::*;

#[test]
fn defines_expand_into_the_command_line() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write(
        "default.xmk",
        "define CP as cp
define FLAGS as -p
build foo
target foo { depends on { foo.c } created using { $CP $FLAGS $(dep[0]) $(target) } }
",
    )?;
    space.write("foo.c", "body")?;
    let out = space.run_expect(&mut xmk_command(vec![]))?;
    assert_output_contains(&out, "cp -p foo.c foo");
    assert_eq!(space.read("foo")?, b"body");
    Ok(())
}

#[test]
fn define_name_list_binds_every_name() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write(
        "default.xmk",
        "define { CP COPY } as cp
build out
target out { depends on { in } created using { $COPY in out } }
",
    )?;
    space.write("in", "")?;
    let out = space.run_expect(&mut xmk_command(vec![]))?;
    assert_output_contains(&out, "cp in out");
    Ok(())
}

#[test]
fn dollar_escape_reaches_the_shell() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write(
        "default.xmk",
        "build out\ntarget out { created using { cp in out $$IGNORED } }\n",
    )?;
    space.write("in", "")?;
    let out = space.run(&mut xmk_command(vec![]))?;
    // The escaped word is echoed with a single dollar; the shell then
    // expands $IGNORED to nothing and the copy succeeds.
    assert_output_contains(&out, "cp in out $IGNORED");
    assert!(space.read("out").is_ok());
    Ok(())
}

#[test]
fn preprocess_prints_expanded_source() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write(
        "default.xmk",
        "define CP as cp
build out
target out { depends on { in } created using { $CP in out } }
",
    )?;
    space.write("in", "")?;
    let out = space.run_expect(&mut xmk_command(vec!["-E"]))?;
    assert_output_contains(&out, "cp in out");
    assert_output_not_contains(&out, "$CP");
    // Nothing was executed.
    assert!(space.read("out").is_err());
    Ok(())
}

#[test]
fn preprocessing_is_idempotent() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write(
        "default.xmk",
        "define CP as cp
build out
target out { depends on { in } created using { $CP in out } }
",
    )?;
    space.write("in", "")?;
    let first = space.run_expect(&mut xmk_command(vec!["-E"]))?;
    space.write("pass1.xmk", std::str::from_utf8(&first.stdout)?)?;
    let second = space.run_expect(&mut xmk_command(vec!["-E", "-f", "pass1.xmk"]))?;
    assert_eq!(first.stdout, second.stdout);
    Ok(())
}

#[test]
fn preprocess_skips_the_missing_build_check() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write("default.xmk", "target x { created using { true } }\n")?;
    let out = space.run(&mut xmk_command(vec!["-E"]))?;
    assert!(out.status.success());
    Ok(())
}

#[test]
fn quoted_words_keep_spaces_and_dollars() -> anyhow::Result<()> {
    let space = TestSpace::new()?;
    space.write(
        "default.xmk",
        "build out\ntarget out { created using { \"cp  in   out\" } }\n",
    )?;
    space.write("in", "")?;
    let out = space.run_expect(&mut xmk_command(vec![]))?;
    // The quoted command is a single list entry with its spacing intact.
    assert_output_contains(&out, "cp  in   out");
    assert!(space.read("out").is_ok());
    Ok(())
}
