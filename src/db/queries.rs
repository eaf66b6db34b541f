use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

use crate::error::Result;
use crate::models::catalog::{
    ClassRecord, FunctionRecord, ImportRecord, ModuleRecord, ProjectRecord, VariableRecord,
};
use crate::models::description::{
    ClassDescription, FunctionDescription, ImportDescription, VariableDescription,
};
use crate::models::hits::{ClassHit, FunctionHit, ModuleHit, VariableHit};

use super::Database;

/// Which text columns a LIKE pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Name,
    Docstring,
    NameOrDocstring,
}

impl MatchField {
    /// WHERE fragment for a table alias. `?1` is the lowered LIKE pattern.
    ///
    /// A NULL docstring makes its LIKE clause NULL, so such rows can only
    /// match on name.
    fn clause(self, alias: &str) -> String {
        let name = format!("LOWER({alias}.name) LIKE ?1 ESCAPE '\\'");
        let doc = format!("LOWER({alias}.docstring) LIKE ?1 ESCAPE '\\'");
        match self {
            Self::Name => name,
            Self::Docstring => doc,
            Self::NameOrDocstring => format!("({name} OR {doc})"),
        }
    }
}

const MODULE_COLUMNS: &str = "id, project_id, name, path, docstring, last_indexed";
const FUNCTION_COLUMNS: &str =
    "id, module_id, class_id, name, docstring, lineno, end_lineno, args, decorators, return_annotation";
const CLASS_COLUMNS: &str =
    "id, module_id, name, docstring, lineno, end_lineno, base_classes, decorators";

impl Database {
    // ─── Project operations ───

    /// Look up a project by its exact (case-sensitive) root path.
    pub fn find_project_by_root(&self, root_path: &str) -> Result<Option<ProjectRecord>> {
        let project = self
            .conn()
            .query_row(
                "SELECT id, name, root_path, created_at, updated_at FROM projects WHERE root_path = ?1",
                params![root_path],
                map_project,
            )
            .optional()?;
        Ok(project)
    }

    /// Insert a project. Returns the new row ID.
    pub fn insert_project(&self, name: &str, root_path: &str) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO projects (name, root_path) VALUES (?1, ?2)",
            params![name, root_path],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Advance `updated_at` to now.
    pub fn touch_project(&self, project_id: i64) -> Result<()> {
        self.conn().execute(
            "UPDATE projects SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?1",
            params![project_id],
        )?;
        Ok(())
    }

    /// Projects with their live module counts, ordered by ID.
    ///
    /// With `project_id` set, at most that one project is returned.
    pub fn project_summaries(&self, project_id: Option<i64>) -> Result<Vec<(ProjectRecord, u64)>> {
        let mut stmt = self.conn().prepare(
            "SELECT p.id, p.name, p.root_path, p.created_at, p.updated_at,
                    (SELECT COUNT(*) FROM modules m WHERE m.project_id = p.id)
             FROM projects p
             WHERE (?1 IS NULL OR p.id = ?1)
             ORDER BY p.id",
        )?;
        let rows = stmt.query_map(params![project_id], |row| {
            Ok((map_project(row)?, row.get::<_, i64>(5)? as u64))
        })?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    // ─── Module operations ───

    /// Look up a module by project and path.
    pub fn find_module(&self, project_id: i64, path: &str) -> Result<Option<ModuleRecord>> {
        let sql = format!("SELECT {MODULE_COLUMNS} FROM modules WHERE project_id = ?1 AND path = ?2");
        let module = self
            .conn()
            .query_row(&sql, params![project_id, path], map_module)
            .optional()?;
        Ok(module)
    }

    /// Look up a module by exact path in any project (oldest row first).
    pub fn get_module_by_path(&self, path: &str) -> Result<Option<ModuleRecord>> {
        let sql = format!("SELECT {MODULE_COLUMNS} FROM modules WHERE path = ?1 ORDER BY id LIMIT 1");
        let module = self
            .conn()
            .query_row(&sql, params![path], map_module)
            .optional()?;
        Ok(module)
    }

    /// Insert a module. Returns the new row ID.
    pub fn insert_module(
        &self,
        project_id: i64,
        name: &str,
        path: &str,
        docstring: Option<&str>,
    ) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO modules (project_id, name, path, docstring) VALUES (?1, ?2, ?3, ?4)",
            params![project_id, name, path, docstring],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Overwrite a module's own fields with the latest parse.
    pub fn update_module(&self, module_id: i64, name: &str, docstring: Option<&str>) -> Result<()> {
        self.conn().execute(
            "UPDATE modules SET name = ?2, docstring = ?3 WHERE id = ?1",
            params![module_id, name, docstring],
        )?;
        Ok(())
    }

    /// Set `last_indexed` to now.
    pub fn stamp_module_indexed(&self, module_id: i64) -> Result<()> {
        self.conn().execute(
            "UPDATE modules SET last_indexed = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?1",
            params![module_id],
        )?;
        Ok(())
    }

    /// Delete every child row of a module.
    ///
    /// Methods go with their class through `ON DELETE CASCADE`.
    pub fn clear_module_children(&self, module_id: i64) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "DELETE FROM functions WHERE module_id = ?1 AND class_id IS NULL",
            params![module_id],
        )?;
        conn.execute("DELETE FROM classes WHERE module_id = ?1", params![module_id])?;
        conn.execute("DELETE FROM imports WHERE module_id = ?1", params![module_id])?;
        conn.execute("DELETE FROM variables WHERE module_id = ?1", params![module_id])?;
        Ok(())
    }

    // ─── Child row inserts ───

    pub fn insert_import(&self, module_id: i64, import: &ImportDescription) -> Result<i64> {
        let parent = if import.is_from_import {
            import.parent_module.as_deref()
        } else {
            None
        };
        self.conn().execute(
            "INSERT INTO imports (module_id, module_name, alias, is_from_import, parent_module)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![module_id, import.name, import.alias, import.is_from_import, parent],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn insert_variable(&self, module_id: i64, var: &VariableDescription) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO variables (module_id, name, lineno, value) VALUES (?1, ?2, ?3, ?4)",
            params![module_id, var.name, var.lineno, var.value],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Insert a class row (without its methods). Returns the new row ID.
    pub fn insert_class(&self, module_id: i64, class: &ClassDescription) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO classes (module_id, name, docstring, lineno, end_lineno, base_classes, decorators)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                module_id,
                class.name,
                class.docstring,
                class.lineno,
                class.end_lineno,
                serde_json::to_string(&class.base_classes)?,
                serde_json::to_string(&class.decorators)?,
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn insert_function(
        &self,
        module_id: i64,
        class_id: Option<i64>,
        func: &FunctionDescription,
    ) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO functions (module_id, class_id, name, docstring, lineno, end_lineno, args, decorators, return_annotation)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                module_id,
                class_id,
                func.name,
                func.docstring,
                func.lineno,
                func.end_lineno,
                serde_json::to_string(&func.args)?,
                serde_json::to_string(&func.decorators)?,
                func.return_annotation,
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    // ─── Child row reads ───

    /// Module-level functions of a module, in insertion order.
    pub fn get_top_level_functions(&self, module_id: i64) -> Result<Vec<FunctionRecord>> {
        let sql = format!(
            "SELECT {FUNCTION_COLUMNS} FROM functions WHERE module_id = ?1 AND class_id IS NULL ORDER BY id"
        );
        self.collect_functions(&sql, module_id)
    }

    /// Methods of a class, in insertion order.
    pub fn get_methods(&self, class_id: i64) -> Result<Vec<FunctionRecord>> {
        let sql = format!("SELECT {FUNCTION_COLUMNS} FROM functions WHERE class_id = ?1 ORDER BY id");
        self.collect_functions(&sql, class_id)
    }

    fn collect_functions(&self, sql: &str, id: i64) -> Result<Vec<FunctionRecord>> {
        let mut stmt = self.conn().prepare(sql)?;
        let rows = stmt.query_map(params![id], map_function)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn get_classes_for_module(&self, module_id: i64) -> Result<Vec<ClassRecord>> {
        let sql = format!("SELECT {CLASS_COLUMNS} FROM classes WHERE module_id = ?1 ORDER BY id");
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params![module_id], map_class)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn get_variables_for_module(&self, module_id: i64) -> Result<Vec<VariableRecord>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, module_id, name, lineno, value FROM variables WHERE module_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![module_id], |row| {
            Ok(VariableRecord {
                id: row.get(0)?,
                module_id: row.get(1)?,
                name: row.get(2)?,
                lineno: row.get(3)?,
                value: row.get(4)?,
            })
        })?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    // ─── Substring search ───
    //
    // `pattern` is an already-lowered, already-escaped LIKE pattern such as
    // `%foo%`. Results are raw (untruncated) and ordered by row ID.

    pub fn search_modules(
        &self,
        pattern: &str,
        field: MatchField,
        project_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<ModuleHit>> {
        let sql = format!(
            "SELECT m.id, m.name, m.path, m.docstring
             FROM modules m
             WHERE {} AND (?2 IS NULL OR m.project_id = ?2)
             ORDER BY m.id
             LIMIT ?3",
            field.clause("m")
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params![pattern, project_id, limit as i64], |row| {
            Ok(ModuleHit {
                id: row.get(0)?,
                name: row.get(1)?,
                path: row.get(2)?,
                docstring: row.get(3)?,
            })
        })?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn search_classes(
        &self,
        pattern: &str,
        field: MatchField,
        project_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<ClassHit>> {
        let sql = format!(
            "SELECT c.id, c.name, m.name, m.path, c.lineno, c.docstring
             FROM classes c
             JOIN modules m ON m.id = c.module_id
             WHERE {} AND (?2 IS NULL OR m.project_id = ?2)
             ORDER BY c.id
             LIMIT ?3",
            field.clause("c")
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params![pattern, project_id, limit as i64], |row| {
            Ok(ClassHit {
                id: row.get(0)?,
                name: row.get(1)?,
                module_name: row.get(2)?,
                path: row.get(3)?,
                lineno: row.get(4)?,
                docstring: row.get(5)?,
            })
        })?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Functions and methods; `class_name` is resolved through `class_id`.
    pub fn search_functions(
        &self,
        pattern: &str,
        field: MatchField,
        project_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<FunctionHit>> {
        let sql = format!(
            "SELECT f.id, f.name, m.name, c.name, m.path, f.lineno, f.docstring
             FROM functions f
             JOIN modules m ON m.id = f.module_id
             LEFT JOIN classes c ON c.id = f.class_id
             WHERE {} AND (?2 IS NULL OR m.project_id = ?2)
             ORDER BY f.id
             LIMIT ?3",
            field.clause("f")
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params![pattern, project_id, limit as i64], |row| {
            Ok(FunctionHit {
                id: row.get(0)?,
                name: row.get(1)?,
                module_name: row.get(2)?,
                class_name: row.get(3)?,
                path: row.get(4)?,
                lineno: row.get(5)?,
                docstring: row.get(6)?,
            })
        })?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Variables by name (variables carry no docstring).
    pub fn search_variables(
        &self,
        pattern: &str,
        project_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<VariableHit>> {
        let sql = format!(
            "SELECT v.id, v.name, m.name, m.path, v.lineno, v.value
             FROM variables v
             JOIN modules m ON m.id = v.module_id
             WHERE {} AND (?2 IS NULL OR m.project_id = ?2)
             ORDER BY v.id
             LIMIT ?3",
            MatchField::Name.clause("v")
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params![pattern, project_id, limit as i64], |row| {
            Ok(VariableHit {
                id: row.get(0)?,
                name: row.get(1)?,
                module_name: row.get(2)?,
                path: row.get(3)?,
                lineno: row.get(4)?,
                value: row.get(5)?,
            })
        })?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Imports whose imported name or parent module matches, with the
    /// owning module's name and path.
    pub fn search_imports(
        &self,
        pattern: &str,
        project_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<(ImportRecord, String, String)>> {
        let mut stmt = self.conn().prepare(
            "SELECT i.id, i.module_id, i.module_name, i.alias, i.is_from_import, i.parent_module,
                    m.name, m.path
             FROM imports i
             JOIN modules m ON m.id = i.module_id
             WHERE (LOWER(i.module_name) LIKE ?1 ESCAPE '\\'
                    OR LOWER(i.parent_module) LIKE ?1 ESCAPE '\\')
               AND (?2 IS NULL OR m.project_id = ?2)
             ORDER BY i.id
             LIMIT ?3",
        )?;
        let rows = stmt.query_map(params![pattern, project_id, limit as i64], |row| {
            Ok((map_import(row)?, row.get(6)?, row.get(7)?))
        })?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}

fn map_project(row: &Row<'_>) -> rusqlite::Result<ProjectRecord> {
    Ok(ProjectRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        root_path: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn map_module(row: &Row<'_>) -> rusqlite::Result<ModuleRecord> {
    Ok(ModuleRecord {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        path: row.get(3)?,
        docstring: row.get(4)?,
        last_indexed: row.get(5)?,
    })
}

fn map_function(row: &Row<'_>) -> rusqlite::Result<FunctionRecord> {
    Ok(FunctionRecord {
        id: row.get(0)?,
        module_id: row.get(1)?,
        class_id: row.get(2)?,
        name: row.get(3)?,
        docstring: row.get(4)?,
        lineno: row.get(5)?,
        end_lineno: row.get(6)?,
        args: json_list(row, 7)?,
        decorators: json_list(row, 8)?,
        return_annotation: row.get(9)?,
    })
}

fn map_class(row: &Row<'_>) -> rusqlite::Result<ClassRecord> {
    Ok(ClassRecord {
        id: row.get(0)?,
        module_id: row.get(1)?,
        name: row.get(2)?,
        docstring: row.get(3)?,
        lineno: row.get(4)?,
        end_lineno: row.get(5)?,
        base_classes: json_list(row, 6)?,
        decorators: json_list(row, 7)?,
    })
}

fn map_import(row: &Row<'_>) -> rusqlite::Result<ImportRecord> {
    Ok(ImportRecord {
        id: row.get(0)?,
        module_id: row.get(1)?,
        module_name: row.get(2)?,
        alias: row.get(3)?,
        is_from_import: row.get(4)?,
        parent_module: row.get(5)?,
    })
}

/// Decode a JSON-encoded string list column.
fn json_list(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
