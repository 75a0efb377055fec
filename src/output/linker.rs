// Thu Oct 15 2026 - Alex

use crate::forward::Generation;
use std::fmt::Write;

pub const LINKER_SOURCE_NAME: &str = "dllmain.cpp";

/// Proxy runtime: loads the renamed original once, from the proxy's own
/// directory first, then by absolute path.
const PREAMBLE_TEMPLATE: &str = r#"#include "pch.h"
#ifndef UNICODE
#define UNICODE
#endif
#ifndef _UNICODE
#define _UNICODE
#endif
#define WIN32_LEAN_AND_MEAN
#include <windows.h>
#include <strsafe.h>

extern "C" IMAGE_DOS_HEADER __ImageBase;
static INIT_ONCE gLoadOnce = INIT_ONCE_STATIC_INIT;
static HMODULE gOriginal = nullptr;
static const wchar_t* kOriginalName = L"{{renamed_base}}.dll";

static void RestrictDllSearchPath() {
    HMODULE kernel32 = GetModuleHandleW(L"kernel32.dll");
    if (!kernel32) return;
    typedef BOOL (WINAPI *SetDefaultDllDirectoriesFn)(DWORD);
    SetDefaultDllDirectoriesFn fn =
        (SetDefaultDllDirectoriesFn)GetProcAddress(kernel32, "SetDefaultDllDirectories");
    if (fn) fn(LOAD_LIBRARY_SEARCH_DEFAULT_DIRS);
}

static BOOL CALLBACK LoadOriginal(PINIT_ONCE, PVOID, PVOID*) {
    wchar_t dir[MAX_PATH];
    DWORD len = GetModuleFileNameW((HMODULE)&__ImageBase, dir, MAX_PATH);
    if (!len) return TRUE;
    for (int i = (int)len - 1; i >= 0; --i) {
        if (dir[i] == L'\\' || dir[i] == L'/') { dir[i] = 0; break; }
    }

    RestrictDllSearchPath();

    HMODULE original = LoadLibraryExW(kOriginalName, NULL, LOAD_LIBRARY_SEARCH_DLL_LOAD_DIR);
    if (!original) {
        wchar_t path[MAX_PATH];
        StringCchCopyW(path, MAX_PATH, dir);
        StringCchCatW(path, MAX_PATH, L"\\");
        StringCchCatW(path, MAX_PATH, kOriginalName);
        original = LoadLibraryExW(path, NULL, LOAD_LIBRARY_SEARCH_DLL_LOAD_DIR);
    }

    gOriginal = original;
    return TRUE;
}

BOOL WINAPI DllMain(HINSTANCE instance, DWORD reason, LPVOID) {
    if (reason == DLL_PROCESS_ATTACH) {
        DisableThreadLibraryCalls(instance);
        InitOnceExecuteOnce(&gLoadOnce, LoadOriginal, NULL, NULL);
    }
    return TRUE;
}

// ---- generated forwarders ----
"#;

pub struct LinkerSourceEmitter;

impl LinkerSourceEmitter {
    pub fn render(generation: &Generation) -> String {
        let mut out = PREAMBLE_TEMPLATE.replace("{{renamed_base}}", &generation.renamed_base);
        out.push_str(&Self::render_directives(generation));
        out
    }

    /// Just the directive lines and the stats trailer, without the runtime.
    pub fn render_directives(generation: &Generation) -> String {
        let mut out = String::new();
        for decl in &generation.declarations {
            let _ = writeln!(out, "#pragma comment(linker, \"{}\")", decl.linker_directive());
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "// stats: {}", generation.stats);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward::{ExportName, ForwardTarget, ForwardingDeclaration, GenerationStats};

    fn generation() -> Generation {
        Generation {
            renamed_base: "Sample_orig".to_string(),
            declarations: vec![
                ForwardingDeclaration {
                    ordinal: 1,
                    export: ExportName::Named("Plugin_Add".into()),
                    target: ForwardTarget::Renamed {
                        base: "Sample_orig".into(),
                        symbol: ExportName::Named("Plugin_Add".into()),
                    },
                },
                ForwardingDeclaration {
                    ordinal: 4,
                    export: ExportName::Ordinal(4),
                    target: ForwardTarget::Renamed {
                        base: "Sample_orig".into(),
                        symbol: ExportName::Ordinal(4),
                    },
                },
            ],
            stats: GenerationStats {
                by_name: 1,
                by_ordinal: 1,
                kept_forwarders: 0,
                gaps: 1,
                probable_data: 0,
            },
        }
    }

    #[test]
    fn test_render_directives() {
        let text = LinkerSourceEmitter::render_directives(&generation());
        assert_eq!(
            text,
            "#pragma comment(linker, \"/export:Plugin_Add=Sample_orig.Plugin_Add\")\n\
             #pragma comment(linker, \"/export:#4=Sample_orig.#4\")\n\
             \n\
             // stats: byName=1 byOrdinal=1 keptForwarders=0 gaps(RVA=0)=1 probableData=0\n"
        );
    }

    #[test]
    fn test_render_full_source() {
        let text = LinkerSourceEmitter::render(&generation());
        assert!(text.contains("L\"Sample_orig.dll\""));
        assert!(!text.contains("{{"));
        assert!(text.contains("InitOnceExecuteOnce"));
        assert!(text.ends_with(&LinkerSourceEmitter::render_directives(&generation())));
    }
}
