//! Lossless printing: the original text with each mutation spliced in.

use crate::tree::{ImportNode, NodeId, NodeKind, SynthesizedDecl, SyntaxTree};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrintError {
    #[error("overlapping edits at byte {0}")]
    Overlap(u32),
}

struct Patch {
    start: u32,
    end: u32,
    seq: usize,
    text: String,
}

impl SyntaxTree {
    /// Prints the tree. Regions no mutation touched are copied byte-for-byte, so
    /// an unmodified tree prints its source exactly.
    pub fn print(&self) -> Result<String, PrintError> {
        let mut patches = Vec::new();
        self.rename_patches(&mut patches);
        self.import_patches(&mut patches);
        self.insertion_patches(&mut patches);
        patches.sort_by_key(|p| (p.start, p.end, p.seq));

        let mut out = String::with_capacity(self.source.len() + 64);
        let mut cursor = 0u32;
        for patch in patches {
            if patch.start < cursor {
                return Err(PrintError::Overlap(patch.start));
            }
            out.push_str(&self.source[cursor as usize..patch.start as usize]);
            out.push_str(&patch.text);
            cursor = patch.end;
        }
        out.push_str(&self.source[cursor as usize..]);
        Ok(out)
    }

    fn rename_patches(&self, patches: &mut Vec<Patch>) {
        for node in &self.nodes {
            let NodeKind::Ident(ident) = &node.kind else {
                continue;
            };
            let (Some(original), Some(site)) = (&ident.renamed_from, ident.binding()) else {
                continue;
            };
            if ident.synthesized || node.span.is_empty() {
                continue;
            }
            let text = if site.shorthand {
                format!("{original}: {}", ident.name)
            } else if site.import_unaliased {
                format!("{original} as {}", ident.name)
            } else {
                ident.name.clone()
            };
            patches.push(Patch {
                start: node.span.start,
                end: node.span.end,
                seq: patches.len(),
                text,
            });
        }
    }

    /// Specifiers appended to imports that exist in the source.
    fn import_patches(&self, patches: &mut Vec<Patch>) {
        for (id, import) in self.imports() {
            if import.added.is_empty() || self.node(id).span.is_empty() {
                continue;
            }
            let names = self.added_names(import);
            let (start, end, text) = match (&import.named, import.default) {
                (Some(named), _) => match named.specifiers.last() {
                    Some(last) => {
                        let at = last.span.end;
                        let multiline =
                            self.lines.line_of(named.open) != self.lines.line_of(last.span.start);
                        let text = if multiline {
                            let indent = self.lines.indent_of(&self.source, last.span.start);
                            let nl = self.newline();
                            names
                                .iter()
                                .map(|n| format!(",{nl}{indent}{n}"))
                                .collect::<String>()
                        } else {
                            names.iter().map(|n| format!(", {n}")).collect::<String>()
                        };
                        (at, at, text)
                    }
                    None => (named.open, named.close + 1, format!("{{ {} }}", names.join(", "))),
                },
                (None, Some(default)) => {
                    let at = self.node(default).span.end;
                    (at, at, format!(", {{ {} }}", names.join(", ")))
                }
                (None, None) => continue,
            };
            patches.push(Patch {
                start,
                end,
                seq: patches.len(),
                text,
            });
        }
    }

    fn insertion_patches(&self, patches: &mut Vec<Patch>) {
        for insertion in &self.insertions {
            let body = self.render_synthesized(insertion.node);
            patches.push(Patch {
                start: insertion.at,
                end: insertion.at,
                seq: patches.len(),
                text: format!("{}{body}{}", insertion.prefix, insertion.suffix),
            });
        }
    }

    fn render_synthesized(&self, id: NodeId) -> String {
        let semi = if self.style.semicolons { ";" } else { "" };
        match &self.node(id).kind {
            NodeKind::Import(import) => {
                let quote = self.style.quote;
                format!(
                    "import {{ {} }} from {quote}{}{quote}{semi}",
                    self.added_names(import).join(", "),
                    import.source
                )
            }
            NodeKind::Synthesized(SynthesizedDecl::State {
                value,
                setter,
                callee,
            }) => format!(
                "const [{}, {}] = {callee}(null){semi}",
                self.name_of(*value).unwrap_or_default(),
                self.name_of(*setter).unwrap_or_default()
            ),
            NodeKind::Synthesized(SynthesizedDecl::Null { name }) => {
                format!("let {} = null{semi}", self.name_of(*name).unwrap_or_default())
            }
            _ => String::new(),
        }
    }

    fn added_names(&self, import: &ImportNode) -> Vec<&str> {
        import
            .added
            .iter()
            .filter_map(|id| self.name_of(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Dialect, parse};
    use pretty_assertions::assert_eq;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unmodified_tree_prints_source() {
        let src = "#!/usr/bin/env node\n'use strict'\nconst a = `x${1}y`; // c\n";
        let tree = parse(src, Dialect::javascript()).unwrap();
        assert_eq!(tree.print().unwrap(), src);
    }

    #[test]
    fn appends_to_single_line_named_imports() {
        let src = "import { useEffect } from 'react';\n";
        let mut tree = parse(src, Dialect::javascript()).unwrap();
        let (id, _) = tree.imports().next().unwrap();
        tree.add_import_names(id, &names(&["useState"])).unwrap();
        assert_eq!(
            tree.print().unwrap(),
            "import { useEffect, useState } from 'react';\n"
        );
    }

    #[test]
    fn appends_to_multiline_named_imports() {
        let src = "import {\n  a,\n  b,\n} from 'm';\n";
        let mut tree = parse(src, Dialect::javascript()).unwrap();
        let (id, _) = tree.imports().next().unwrap();
        tree.add_import_names(id, &names(&["c"])).unwrap();
        assert_eq!(tree.print().unwrap(), "import {\n  a,\n  b,\n  c,\n} from 'm';\n");
    }

    #[test]
    fn default_only_import_gains_a_named_clause() {
        let src = "import React from \"react\";\n";
        let mut tree = parse(src, Dialect::javascript()).unwrap();
        let (id, _) = tree.imports().next().unwrap();
        tree.add_import_names(id, &names(&["useState"])).unwrap();
        assert_eq!(
            tree.print().unwrap(),
            "import React, { useState } from \"react\";\n"
        );
    }

    #[test]
    fn empty_named_clause_is_filled() {
        let src = "import {} from 'm';\n";
        let mut tree = parse(src, Dialect::javascript()).unwrap();
        let (id, _) = tree.imports().next().unwrap();
        tree.add_import_names(id, &names(&["a", "b"])).unwrap();
        assert_eq!(tree.print().unwrap(), "import { a, b } from 'm';\n");
    }

    #[test]
    fn new_import_follows_leading_imports() {
        let src = "import a from 'a';\nimport b from 'b';\n\nrun();\n";
        let mut tree = parse(src, Dialect::javascript()).unwrap();
        tree.insert_import("sonner", &names(&["toast"]));
        assert_eq!(
            tree.print().unwrap(),
            "import a from 'a';\nimport b from 'b';\nimport { toast } from 'sonner';\n\nrun();\n"
        );
    }

    #[test]
    fn new_import_without_imports_goes_after_directives() {
        let src = "\"use client\"\n\nrun()\nstop()\n";
        let mut tree = parse(src, Dialect::javascript()).unwrap();
        tree.insert_import("sonner", &names(&["toast"]));
        assert_eq!(
            tree.print().unwrap(),
            "\"use client\"\nimport { toast } from \"sonner\"\n\nrun()\nstop()\n"
        );
    }

    #[test]
    fn new_import_follows_imports_after_a_directive() {
        let src = "'use client';\nimport React, { useEffect } from 'react';\nimport { Card } from './card';\n\nexport default function App() {}\n";
        let mut tree = parse(src, Dialect::javascript()).unwrap();
        tree.insert_import("@/lib/utils", &names(&["cn"]));
        assert_eq!(
            tree.print().unwrap(),
            "'use client';\nimport React, { useEffect } from 'react';\nimport { Card } from './card';\nimport { cn } from '@/lib/utils';\n\nexport default function App() {}\n"
        );
    }

    #[test]
    fn new_import_in_a_bare_file_goes_first() {
        let src = "run();\n";
        let mut tree = parse(src, Dialect::javascript()).unwrap();
        tree.insert_import("m", &names(&["x"]));
        assert_eq!(tree.print().unwrap(), "import { x } from 'm';\nrun();\n");
    }

    #[test]
    fn declarations_are_indented_like_the_body() {
        let src = "function App() {\n    return null;\n}\n";
        let mut tree = parse(src, Dialect::javascript()).unwrap();
        let app = tree.first_component().unwrap();
        tree.prepend_state_declaration(app, "count", "setCount", "useState")
            .unwrap();
        tree.prepend_null_declaration(app, "user").unwrap();
        assert_eq!(
            tree.print().unwrap(),
            "function App() {\n    const [count, setCount] = useState(null);\n    let user = null;\n    return null;\n}\n"
        );
    }

    #[test]
    fn declarations_open_up_an_empty_body() {
        let src = "const App = () => {};\n";
        let mut tree = parse(src, Dialect::javascript()).unwrap();
        let app = tree.first_component().unwrap();
        tree.prepend_null_declaration(app, "a").unwrap();
        tree.prepend_null_declaration(app, "b").unwrap();
        assert_eq!(
            tree.print().unwrap(),
            "const App = () => {\n  let a = null;\n  let b = null;\n};\n"
        );
    }

    #[test]
    fn shorthand_and_import_renames_keep_the_outer_name() {
        let src = "import { temp } from 'm';\nconst { other } = obj;\n";
        let mut tree = parse(src, Dialect::javascript()).unwrap();
        let module = tree.module_scope();
        let temp = tree.scopes().get(module).bindings["temp"][0];
        let other = tree.scopes().get(module).bindings["other"][0];
        tree.rename_binding(temp, "_temp").unwrap();
        tree.rename_binding(other, "_other").unwrap();
        assert_eq!(
            tree.print().unwrap(),
            "import { temp as _temp } from 'm';\nconst { other: _other } = obj;\n"
        );
    }
}
