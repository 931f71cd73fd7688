fn main() -> anyhow::Result<()> {
    #[cfg(not(target_os = "android"))]
    {
        example::desktop_main()
    }
    #[cfg(target_os = "android")]
    {
        // The android entry point lives in lib.rs; this stub only keeps
        // non-android tooling happy.
        Ok(())
    }
}
