// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Permalinks of the built-in package table.

use cppdoc_permalink::Resolver;
use rstest::rstest;

#[rstest]
#[case::ninja("ninja", "1.7.2", "src/build.cc", 42,
    "https://github.com/ninja-build/ninja/tree/v1.7.2/src/build.cc#L42")]
#[case::mosh("mosh", "1.3.2", "src/network/network.cc", 5,
    "https://github.com/mobile-shell/mosh/tree/mosh-1.3.2/src/network/network.cc#L5")]
#[case::fish("fish", "2.6.0", "fish-shell-2.6.0/src/builtin.cpp", 120,
    "https://github.com/fish-shell/fish-shell/tree/2.6.0/src/builtin.cpp#L120")]
#[case::opencv("opencv", "3.3.0", "modules/core/src/matrix.cpp", 1,
    "https://github.com/opencv/opencv/tree/3.3.0/modules/core/src/matrix.cpp#L1")]
#[case::protobuf("protobuf", "3.4.1", "src/google/protobuf/message.cc", 88,
    "https://github.com/google/protobuf/tree/v3.4.1/src/google/protobuf/message.cc#L88")]
#[case::bitcoin("bitcoin", "0.15.1", "src/validation.cpp", 2000,
    "https://github.com/bitcoin/bitcoin/tree/v0.15.1/src/validation.cpp#L2000")]
#[case::libsequence("libsequence", "1.9.2", "libsequence-1.9.2/src/SimData.cc", 17,
    "https://github.com/molpopgen/libsequence/tree/1.9.2/src/SimData.cc#L17")]
#[case::clang_tools_extra("llvm", "4.0.0", "tools/clang/tools/extra/foo.cpp", 10,
    "https://github.com/llvm-mirror/clang-tools-extra/tree/release_40/foo.cpp#L10")]
#[case::clang("llvm", "5.0.0", "tools/clang/lib/Sema/Sema.cpp", 3,
    "https://github.com/llvm-mirror/clang/tree/release_50/lib/Sema/Sema.cpp#L3")]
#[case::lldb("llvm", "4.0.0", "tools/lldb/source/Core/Debugger.cpp", 9,
    "https://github.com/llvm-mirror/lldb/tree/release_40/source/Core/Debugger.cpp#L9")]
#[case::lld("llvm", "4.0.0", "tools/lld/ELF/Driver.cpp", 12,
    "https://github.com/llvm-mirror/lld/tree/release_40/ELF/Driver.cpp#L12")]
#[case::compiler_rt("llvm", "4.0.0", "projects/compiler-rt/lib/asan/asan_rtl.cc", 30,
    "https://github.com/llvm-mirror/compiler-rt/tree/release_40/lib/asan/asan_rtl.cc#L30")]
#[case::llvm("llvm", "5.0.0", "lib/IR/Function.cpp", 77,
    "https://github.com/llvm-mirror/llvm/tree/release_50/lib/IR/Function.cpp#L77")]
fn test_mapped(
    #[case] slug: &str,
    #[case] version: &str,
    #[case] path: &str,
    #[case] line: u32,
    #[case] expected: &str,
) {
    let url = Resolver::builtin().resolve(slug, version, path, line);
    assert_eq!(url.as_ref().map(|u| u.as_str()), Some(expected));
}

#[rstest]
#[case::llvm_build_dir("llvm", "4.0.0", "build/generated.h")]
#[case::llvm_unknown_version("llvm", "3.9.1", "lib/IR/Function.cpp")]
#[case::fish_outside_root("fish", "2.6.0", "src/builtin.cpp")]
#[case::fish_other_version("fish", "2.6.0", "fish-shell-2.7.0/src/builtin.cpp")]
#[case::libsequence_outside_root("libsequence", "1.9.2", "Sequence/SimData.hpp")]
#[case::unknown_slug("gcc", "7.2.0", "gcc/tree.c")]
#[case::backslash_parent("ninja", "1.7.2", "src\\..\\..\\..\\..\\evil\\x.cc")]
#[case::backslash_separator("mosh", "1.3.2", "src\\network\\network.cc")]
#[case::parent_tag("opencv", "..", "modules/core/a.hpp")]
#[case::parent_segment("fish", "2.6.0", "fish-shell-2.6.0/../other/x.cc")]
fn test_unmapped(#[case] slug: &str, #[case] version: &str, #[case] path: &str) {
    assert_eq!(Resolver::builtin().resolve(slug, version, path, 1), None);
}
