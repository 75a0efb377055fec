// Thu Oct 15 2026 - Alex

const HOST_TEMPLATE: &str = r#"#include "pch.h"
#define WIN32_LEAN_AND_MEAN
#include <windows.h>
#include <stdio.h>

int wmain() {
    HMODULE module = LoadLibraryW(L"{{proxy_name}}");
    if (!module) {
        wprintf(L"LoadLibrary failed: %lu\n", GetLastError());
        return 1;
    }
    wprintf(L"Loaded {{proxy_name}}\n");
    FreeLibrary(module);
    return 0;
}
"#;

/// Loader smoke test for the built proxy. Depends on the base name only.
pub struct HostEmitter;

impl HostEmitter {
    pub fn file_name(base_name: &str) -> String {
        format!("Host_{}.cpp", base_name)
    }

    pub fn render(base_name: &str) -> String {
        HOST_TEMPLATE.replace("{{proxy_name}}", &format!("{}.dll", base_name))
    }
}
