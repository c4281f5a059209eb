// ABOUTME: Generator for the built-in fixture projects.
// ABOUTME: Writes each project's sources so its program prints the configured success marker.

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::catalog::FixtureCase;
use crate::error::Result;

/// Placeholder replaced by the success marker in every template.
const MARKER: &str = "@MARKER@";

struct Template {
    id: &'static str,
    files: &'static [(&'static str, &'static str)],
}

const TEMPLATES: &[Template] = &[
    Template {
        id: "java/simple",
        files: &[(
            "Main.java",
            r#"public class Main {
    public static void main(String[] args) {
        System.out.println("JAVA SIMPLE: @MARKER@!");
    }
}
"#,
        )],
    },
    Template {
        id: "java/maven",
        files: &[
            (
                "pom.xml",
                r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>
    <groupId>com.test</groupId>
    <artifactId>maven-app</artifactId>
    <version>1.0.0</version>
    <properties>
        <maven.compiler.source>17</maven.compiler.source>
        <maven.compiler.target>17</maven.compiler.target>
        <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>
    </properties>
    <build>
        <plugins>
            <plugin>
                <groupId>org.codehaus.mojo</groupId>
                <artifactId>exec-maven-plugin</artifactId>
                <version>3.1.0</version>
                <configuration>
                    <mainClass>com.test.Main</mainClass>
                </configuration>
            </plugin>
        </plugins>
    </build>
</project>
"#,
            ),
            (
                "src/main/java/com/test/Main.java",
                r#"package com.test;

public class Main {
    public static void main(String[] args) {
        System.out.println("JAVA MAVEN: @MARKER@!");
    }
}
"#,
            ),
        ],
    },
    Template {
        id: "java/gradle",
        files: &[
            (
                "build.gradle",
                r#"plugins {
    id 'java'
    id 'application'
}

group = 'com.test'
version = '1.0.0'
sourceCompatibility = '17'

application {
    mainClass = 'com.test.Main'
}

repositories {
    mavenCentral()
}

jar {
    manifest {
        attributes 'Main-Class': 'com.test.Main'
    }
}
"#,
            ),
            (
                "src/main/java/com/test/Main.java",
                r#"package com.test;

public class Main {
    public static void main(String[] args) {
        System.out.println("JAVA GRADLE: @MARKER@!");
    }
}
"#,
            ),
        ],
    },
    Template {
        id: "java/spring-boot",
        files: &[
            (
                "pom.xml",
                r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>
    <parent>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-starter-parent</artifactId>
        <version>3.1.0</version>
    </parent>
    <groupId>com.test</groupId>
    <artifactId>spring-app</artifactId>
    <version>1.0.0</version>
    <dependencies>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter</artifactId>
        </dependency>
    </dependencies>
    <build>
        <plugins>
            <plugin>
                <groupId>org.springframework.boot</groupId>
                <artifactId>spring-boot-maven-plugin</artifactId>
            </plugin>
        </plugins>
    </build>
</project>
"#,
            ),
            (
                "src/main/java/com/test/Application.java",
                r#"package com.test;

import org.springframework.boot.CommandLineRunner;
import org.springframework.boot.SpringApplication;
import org.springframework.boot.autoconfigure.SpringBootApplication;

@SpringBootApplication
public class Application implements CommandLineRunner {
    public static void main(String[] args) {
        SpringApplication.run(Application.class, args);
    }

    @Override
    public void run(String... args) {
        System.out.println("JAVA SPRING BOOT: @MARKER@!");
        System.exit(0);
    }
}
"#,
            ),
        ],
    },
    Template {
        id: "go/simple",
        files: &[(
            "main.go",
            r#"package main

import "fmt"

func main() {
    fmt.Println("GO SIMPLE: @MARKER@!")
}
"#,
        )],
    },
    Template {
        id: "go/modules",
        files: &[
            ("go.mod", "module test-app\n\ngo 1.21\n"),
            (
                "main.go",
                r#"package main

import "fmt"

func main() {
    fmt.Println("GO MODULES: @MARKER@!")
}
"#,
            ),
        ],
    },
    Template {
        id: "go/multi-file",
        files: &[
            ("go.mod", "module multi-app\n\ngo 1.21\n"),
            (
                "main.go",
                r#"package main

import "fmt"

func main() {
    fmt.Println("GO MULTI-FILE:", getMessage())
}
"#,
            ),
            (
                "utils.go",
                r#"package main

func getMessage() string {
    return "@MARKER@!"
}
"#,
            ),
        ],
    },
    Template {
        id: "go/task",
        files: &[
            (
                "Taskfile.yml",
                r#"version: '3'
tasks:
  default:
    cmds:
      - echo "GO TASK: @MARKER@!"
    silent: true
"#,
            ),
            (
                "main.go",
                r#"package main

import "fmt"

func main() {
    fmt.Println("GO TASK: @MARKER@!")
}
"#,
            ),
        ],
    },
    Template {
        id: "go/mage",
        files: &[(
            "magefile.go",
            r#"//go:build mage

package main

import (
    "fmt"
    "os"
)

func Build() {
    fmt.Println("GO MAGE: @MARKER@!")
    os.Exit(0)
}
"#,
        )],
    },
    Template {
        id: "go/cmd-structure",
        files: &[
            ("go.mod", "module cmd-app\n\ngo 1.21\n"),
            (
                "cmd/myapp/main.go",
                r#"package main

import "fmt"

func main() {
    fmt.Println("GO CMD STRUCTURE: @MARKER@!")
}
"#,
            ),
        ],
    },
    Template {
        id: "js/simple",
        files: &[(
            "index.js",
            "console.log(\"NODE.JS SIMPLE: @MARKER@!\");\nprocess.exit(0);\n",
        )],
    },
    Template {
        id: "js/npm",
        files: &[
            (
                "package.json",
                r#"{
    "name": "test-npm-app",
    "version": "1.0.0",
    "main": "index.js",
    "scripts": {
        "start": "node index.js"
    },
    "dependencies": {
        "axios": "^1.5.0"
    }
}
"#,
            ),
            (
                "index.js",
                "console.log(\"NODE.JS NPM: @MARKER@!\");\nprocess.exit(0);\n",
            ),
        ],
    },
    Template {
        id: "js/typescript",
        files: &[
            (
                "package.json",
                r#"{
    "name": "test-ts-app",
    "version": "1.0.0",
    "main": "dist/index.js",
    "scripts": {
        "build": "tsc",
        "start": "node dist/index.js"
    },
    "devDependencies": {
        "typescript": "^5.2.0"
    }
}
"#,
            ),
            (
                "tsconfig.json",
                r#"{
    "compilerOptions": {
        "target": "ES2020",
        "module": "CommonJS",
        "outDir": "./dist",
        "rootDir": "./src",
        "strict": true,
        "esModuleInterop": true
    }
}
"#,
            ),
            (
                "src/index.ts",
                "console.log(\"TYPESCRIPT: @MARKER@!\");\nprocess.exit(0);\n",
            ),
        ],
    },
    Template {
        id: "js/express",
        files: &[
            (
                "package.json",
                r#"{
    "name": "test-express-app",
    "version": "1.0.0",
    "main": "index.js",
    "scripts": {
        "start": "node index.js"
    },
    "dependencies": {
        "express": "^4.18.2"
    }
}
"#,
            ),
            (
                "index.js",
                r#"const express = require("express");
const app = express();
app.get("/", (req, res) => {
    res.send("EXPRESS.JS: @MARKER@!");
});
const server = app.listen(3000, () => {
    console.log("EXPRESS.JS: @MARKER@! Server running on port 3000");
    server.close(() => process.exit(0));
});
"#,
            ),
        ],
    },
    Template {
        id: "js/react",
        files: &[(
            "package.json",
            r#"{
    "name": "test-react-app",
    "version": "1.0.0",
    "scripts": {
        "start": "node -e \"console.log('REACT: @MARKER@!'); process.exit(0)\"",
        "build": "echo \"Building React app\""
    },
    "dependencies": {
        "react": "^18.2.0",
        "react-dom": "^18.2.0"
    }
}
"#,
        )],
    },
    Template {
        id: "js/yarn",
        files: &[
            (
                "package.json",
                r#"{
    "name": "test-yarn-app",
    "version": "1.0.0",
    "main": "index.js",
    "scripts": {
        "start": "node index.js"
    }
}
"#,
            ),
            (
                "yarn.lock",
                "# THIS IS AN AUTOGENERATED FILE. DO NOT EDIT THIS FILE DIRECTLY.\n# yarn lockfile v1\n",
            ),
            (
                "index.js",
                "console.log(\"YARN: @MARKER@!\");\nprocess.exit(0);\n",
            ),
        ],
    },
];

/// Whether boxrun ships sources for the fixture `id`.
pub fn has_template(id: &str) -> bool {
    TEMPLATES.iter().any(|t| t.id == id)
}

/// Write the sources of every case that has a built-in template and no
/// project directory yet. Existing projects are left untouched.
///
/// Returns the ids of the projects written.
pub fn generate_fixtures(
    fixtures_dir: &Path,
    cases: &[FixtureCase],
    marker: &str,
) -> Result<Vec<String>> {
    let mut written = Vec::new();
    for case in cases {
        let Some(template) = TEMPLATES.iter().find(|t| t.id == case.id) else {
            debug!(case = %case.id, "No built-in sources for fixture");
            continue;
        };
        let project = case.project_dir(fixtures_dir);
        if project.exists() {
            continue;
        }

        for (rel, contents) in template.files {
            let path = project.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, contents.replace(MARKER, marker))?;
        }
        written.push(case.id.clone());
    }

    info!(
        count = written.len(),
        dir = %fixtures_dir.display(),
        "Generated fixture projects"
    );
    Ok(written)
}
