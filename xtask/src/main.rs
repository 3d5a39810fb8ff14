use xflags::xflags;
use xshell::{cmd, Shell};

xflags! {
    cmd xtask {
        cmd testmatrix {}
        cmd bench {}
    }
}

fn main() -> xshell::Result<()> {
    match Xtask::from_env_or_exit().subcommand {
        XtaskCmd::Testmatrix(Testmatrix {}) => test_matrix(),
        XtaskCmd::Bench(Bench {}) => bench(),
    }
}

fn test_matrix() -> xshell::Result<()> {
    let sh = Shell::new()?;

    // Any combination of features should work and run tests.
    cmd!(sh, "cargo hack test -p chacha20block --feature-powerset").run()?;
    // ... and also be warning-free
    cmd!(
        sh,
        "cargo hack clippy -p chacha20block --feature-powerset -- --deny warnings"
    )
    .run()?;
    cmd!(sh, "cargo test -p chacha20block-cli -p benchmarks").run()?;

    let cross_targets = [
        "i686-unknown-linux-gnu",   // 32-bit usize
        "s390x-unknown-linux-gnu",  // big endian host, output bytes must not change
        "x86_64-unknown-linux-gnu", // reference
    ];
    for target in cross_targets {
        cmd!(
            sh,
            "cargo clippy --target {target} -p chacha20block --all-features -- --deny warnings"
        )
        .run()?;

        for feat in ["--no-default-features", "--all-features"] {
            // Overriding RUSTFLAGS for `cross test` prevents the container picking up RUSTFLAGS
            // meant for the host (e.g., from $CARGO_HOME/config.toml) which can break stuff.
            cmd!(
                sh,
                "cargo bin cross test --target {target} -p chacha20block {feat}"
            )
            .env("RUSTFLAGS", "")
            .run()?;
        }
    }
    // x86_64-unknown-none has no std, so this only checks that the default build stays no_std.
    cmd!(
        sh,
        "cargo clippy --target x86_64-unknown-none -p chacha20block -- --deny warnings"
    )
    .run()?;
    Ok(())
}

fn bench() -> xshell::Result<()> {
    let sh = Shell::new()?;
    cmd!(sh, "cargo run --release -p benchmarks").run()?;
    Ok(())
}
